// SPDX-License-Identifier: MPL-2.0
//! Boundary to the host GUI framework.
//!
//! The toaster never renders anything itself. It drives a [`Host`], which
//! owns the actual popup surfaces, layout and opacity animations. Animation
//! completion comes back through an [`AnimationDone`] token that posts a
//! message onto the toaster's channel, from whatever thread the host's
//! animation engine runs on.
//!
//! Hosts whose popups dismiss themselves on an outside click should forward
//! that click as [`ToastSender::hide`](crate::toast::ToastSender::hide) so
//! the toast fades out and releases its display slot.

use std::fmt;
use std::time::Duration;

use crossbeam_channel::Sender;
use iced_core::{Point, Rectangle, Size};

use crate::domain::toast::Opacity;
use crate::error::HostError;
use crate::toast::{Event, Message, ToastId};

/// An opacity animation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    /// Starting opacity, or `None` to start from the current value.
    pub from: Option<Opacity>,
    /// Final opacity.
    pub to: Opacity,
    /// Animation length. Zero still requires a completion report.
    pub duration: Duration,
}

/// Completion token for an opacity animation.
///
/// The host must call [`finish`](Self::finish) exactly once when the
/// animation reaches its end value. Dropping the token without finishing
/// leaves the toast in its fading state until it is hidden.
#[must_use = "the toaster waits for the animation to be reported as finished"]
pub struct AnimationDone {
    target: Sender<Message>,
    message: Message,
}

impl AnimationDone {
    pub(crate) fn new(target: Sender<Message>, event: Event) -> Self {
        Self {
            target,
            message: event.into(),
        }
    }

    /// Reports completion to the toaster. Safe to call from any thread.
    pub fn finish(self) {
        // A dropped toaster has nothing left to animate.
        let _ = self.target.send(self.message);
    }

    /// Returns the message that will be delivered on completion.
    #[must_use]
    pub fn message(&self) -> Message {
        self.message
    }

    /// Splits the token for hosts that hand completion to a [`Timer`](crate::timer::Timer).
    #[must_use]
    pub fn into_parts(self) -> (Sender<Message>, Message) {
        (self.target, self.message)
    }
}

impl fmt::Debug for AnimationDone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationDone")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Display capabilities a GUI framework provides to the toaster.
///
/// Every method is called on the UI thread that owns the toaster.
pub trait Host {
    /// Presentable content of a toast (a widget tree, a label, ...).
    type Content: fmt::Debug;
    /// Handle to a top-level window.
    type Window: Clone + fmt::Debug;
    /// Handle to a node inside a window.
    type Anchor: Clone + fmt::Debug;

    /// Screen bounds of a live window, `None` if it is closed or unknown.
    fn window_bounds(&self, window: &Self::Window) -> Option<Rectangle>;

    /// Window an anchor node is attached to.
    fn anchor_window(&self, anchor: &Self::Anchor) -> Option<Self::Window>;

    /// Screen bounds of an anchor node.
    fn anchor_bounds(&self, anchor: &Self::Anchor) -> Option<Rectangle>;

    /// Size the content asks for before it has been laid out.
    fn preferred_size(&self, content: &Self::Content) -> Size;

    /// Size of a shown toast after layout, if known.
    fn measured_size(&self, id: ToastId) -> Option<Size>;

    /// Shows the toast popup over `window` with its top-left corner at `at`.
    ///
    /// # Errors
    ///
    /// Returns a [`HostError`] if the popup cannot be shown; the toaster then
    /// abandons this display attempt.
    fn show(
        &mut self,
        id: ToastId,
        content: &Self::Content,
        window: &Self::Window,
        at: Point,
    ) -> Result<(), HostError>;

    /// Moves a shown popup.
    fn reposition(&mut self, id: ToastId, at: Point);

    /// Removes the popup from the screen.
    fn hide(&mut self, id: ToastId);

    /// Animates the content opacity of a shown popup.
    fn animate_opacity(&mut self, id: ToastId, fade: Fade, done: AnimationDone);
}
