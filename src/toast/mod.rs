// SPDX-License-Identifier: MPL-2.0
//! Transient toast notifications.
//!
//! A toast fades in, stays for its duration, fades out, and waits in line if
//! another toast is already on screen.
//!
//! # Components
//!
//! - [`Toast`] - Content plus presentation parameters for one notification
//! - [`Toaster`] - UI-thread controller driving each toast's lifecycle
//! - [`Target`] - Where a toast is displayed (window, screen point, anchor)
//!
//! # Usage
//!
//! ```ignore
//! use toast_relay::toast::{Target, Toast, Toaster};
//! use toast_relay::ToastDuration;
//!
//! let mut toaster = Toaster::new(host)?;
//! let id = toaster.request_show(Toast::text("Saved", ToastDuration::SHORT), Target::Window(window))?;
//!
//! // In the UI event loop
//! toaster.process_pending();
//! ```
//!
//! # Lifecycle
//!
//! `Idle -> Queued -> FadingIn -> Visible -> FadingOut -> Idle`. Only one
//! toast per [`Scheduler`](crate::scheduler::Scheduler) is ever in one of the
//! three displayed states.

mod placement;
mod toaster;

use std::fmt;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use iced_core::Vector;

use crate::config::defaults::{DEFAULT_FADE_IN_MS, DEFAULT_FADE_OUT_MS};
use crate::domain::toast::{Opacity, ToastDuration};
use crate::error::Result;

pub use placement::{beside, centered, Side, Target};
pub use toaster::{Message, Request, ToastSender, Toaster};
pub(crate) use toaster::Event;

/// Unique identifier for a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(u64);

impl ToastId {
    /// Creates a new unique toast ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ToastId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastState {
    /// Not submitted, dropped, withdrawn, or finished.
    #[default]
    Idle,
    /// Waiting for the display slot.
    Queued,
    /// Shown, content opacity animating up.
    FadingIn,
    /// Shown at full content opacity.
    Visible,
    /// Shown, content opacity animating down to zero.
    FadingOut,
}

impl ToastState {
    /// Returns true if the toast holds the display slot.
    #[must_use]
    pub fn is_displayed(self) -> bool {
        matches!(self, Self::FadingIn | Self::Visible | Self::FadingOut)
    }
}

// =============================================================================
// Process-wide defaults
// =============================================================================

/// Presentation defaults applied to newly constructed toasts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToastDefaults {
    pub content_opacity: Opacity,
    pub fade_in: Duration,
    pub fade_out: Duration,
}

impl ToastDefaults {
    /// The built-in defaults.
    pub const BUILTIN: Self = Self {
        content_opacity: Opacity::DEFAULT,
        fade_in: Duration::from_millis(DEFAULT_FADE_IN_MS),
        fade_out: Duration::from_millis(DEFAULT_FADE_OUT_MS),
    };

    /// Returns the defaults currently in effect.
    #[must_use]
    pub fn current() -> Self {
        *DEFAULTS.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes these the defaults for toasts constructed from now on.
    pub fn install(self) {
        *DEFAULTS.write().unwrap_or_else(PoisonError::into_inner) = self;
    }
}

impl Default for ToastDefaults {
    fn default() -> Self {
        Self::BUILTIN
    }
}

static DEFAULTS: RwLock<ToastDefaults> = RwLock::new(ToastDefaults::BUILTIN);

/// Sets the default content opacity for new toasts.
pub fn set_default_content_opacity(opacity: f32) {
    let mut defaults = DEFAULTS.write().unwrap_or_else(PoisonError::into_inner);
    defaults.content_opacity = Opacity::new(opacity);
}

/// Sets the default fade-in time for new toasts.
pub fn set_default_fade_in(fade_in: Duration) {
    DEFAULTS.write().unwrap_or_else(PoisonError::into_inner).fade_in = fade_in;
}

/// Sets the default fade-out time for new toasts.
pub fn set_default_fade_out(fade_out: Duration) {
    DEFAULTS.write().unwrap_or_else(PoisonError::into_inner).fade_out = fade_out;
}

// =============================================================================
// Toast
// =============================================================================

/// A notification waiting to be shown.
///
/// Construction picks up the current [`ToastDefaults`]. Submitting the toast
/// to a [`Toaster`] moves it there until it has finished hiding.
#[derive(Debug)]
pub struct Toast<C> {
    id: ToastId,
    content: C,
    duration: ToastDuration,
    fade_in: Duration,
    fade_out: Duration,
    content_opacity: Opacity,
    auto_center: bool,
    offset: Vector,
    state: ToastState,
}

impl<C> Toast<C> {
    /// Creates a toast showing `content` for `duration`.
    pub fn new(content: C, duration: ToastDuration) -> Self {
        let defaults = ToastDefaults::current();
        Self {
            id: ToastId::new(),
            content,
            duration,
            fade_in: defaults.fade_in,
            fade_out: defaults.fade_out,
            content_opacity: defaults.content_opacity,
            auto_center: true,
            offset: Vector::new(0.0, 0.0),
            state: ToastState::Idle,
        }
    }

    /// Sets the fade-in time.
    #[must_use]
    pub fn with_fade_in(mut self, fade_in: Duration) -> Self {
        self.fade_in = fade_in;
        self
    }

    /// Sets the fade-out time.
    #[must_use]
    pub fn with_fade_out(mut self, fade_out: Duration) -> Self {
        self.fade_out = fade_out;
        self
    }

    /// Sets the opacity the content fades in to.
    #[must_use]
    pub fn with_content_opacity(mut self, opacity: f32) -> Self {
        self.content_opacity = Opacity::new(opacity);
        self
    }

    /// Enables or disables continuous centering over the target window.
    #[must_use]
    pub fn with_auto_center(mut self, auto_center: bool) -> Self {
        self.auto_center = auto_center;
        self
    }

    /// Shifts the centered position by `offset`.
    #[must_use]
    pub fn with_offset(mut self, offset: Vector) -> Self {
        self.offset = offset;
        self
    }

    /// Replaces the content.
    pub fn set_content(&mut self, content: C) {
        self.content = content;
    }

    /// Replaces the duration.
    pub fn set_duration(&mut self, duration: ToastDuration) {
        self.duration = duration;
    }

    /// Replaces the duration with a finite number of milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDuration`](crate::error::Error::InvalidDuration)
    /// if `millis` is zero; the previous duration is kept.
    pub fn set_duration_millis(&mut self, millis: u64) -> Result<()> {
        self.duration = ToastDuration::from_millis(millis)?;
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> ToastId {
        self.id
    }

    #[must_use]
    pub fn content(&self) -> &C {
        &self.content
    }

    #[must_use]
    pub fn duration(&self) -> ToastDuration {
        self.duration
    }

    #[must_use]
    pub fn fade_in(&self) -> Duration {
        self.fade_in
    }

    #[must_use]
    pub fn fade_out(&self) -> Duration {
        self.fade_out
    }

    #[must_use]
    pub fn content_opacity(&self) -> Opacity {
        self.content_opacity
    }

    #[must_use]
    pub fn auto_center(&self) -> bool {
        self.auto_center
    }

    #[must_use]
    pub fn offset(&self) -> Vector {
        self.offset
    }

    #[must_use]
    pub fn state(&self) -> ToastState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: ToastState) {
        self.state = state;
    }
}

impl Toast<String> {
    /// Creates a plain-text toast.
    pub fn text(text: impl Into<String>, duration: ToastDuration) -> Self {
        Self::new(text.into(), duration)
    }
}

impl<C: fmt::Debug> fmt::Display for Toast<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Toast{{id={}, content={:?}}}", self.id, self.content)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_utils::assert_abs_diff_eq;
    use std::sync::{Mutex, OnceLock};

    /// Serializes tests that modify the process-wide defaults.
    pub(crate) fn defaults_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    #[test]
    fn toast_ids_are_unique() {
        let a = Toast::text("a", ToastDuration::SHORT);
        let b = Toast::text("a", ToastDuration::SHORT);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn new_toast_is_idle_and_centered() {
        let toast = Toast::text("hello", ToastDuration::LONG);
        assert_eq!(toast.state(), ToastState::Idle);
        assert!(toast.auto_center());
        assert_eq!(toast.offset(), Vector::new(0.0, 0.0));
        assert_eq!(toast.content(), "hello");
    }

    #[test]
    fn builder_pattern_works() {
        let toast = Toast::text("saved", ToastDuration::INFINITE)
            .with_fade_in(Duration::from_millis(100))
            .with_fade_out(Duration::from_millis(50))
            .with_content_opacity(0.5)
            .with_auto_center(false)
            .with_offset(Vector::new(0.0, 40.0));

        assert_eq!(toast.fade_in(), Duration::from_millis(100));
        assert_eq!(toast.fade_out(), Duration::from_millis(50));
        assert_abs_diff_eq!(toast.content_opacity().value(), 0.5);
        assert!(!toast.auto_center());
        assert_eq!(toast.offset(), Vector::new(0.0, 40.0));
        assert!(toast.duration().is_infinite());
    }

    #[test]
    fn zero_duration_is_rejected_and_previous_kept() {
        let mut toast = Toast::text("x", ToastDuration::SHORT);
        assert_eq!(toast.set_duration_millis(0), Err(Error::InvalidDuration(0)));
        assert_eq!(toast.duration(), ToastDuration::SHORT);

        toast.set_duration_millis(750).expect("positive duration");
        assert_eq!(toast.duration().millis(), Some(750));
    }

    #[test]
    fn installed_defaults_apply_to_new_toasts() {
        let _guard = defaults_lock().lock().unwrap_or_else(PoisonError::into_inner);
        let previous = ToastDefaults::current();

        set_default_content_opacity(0.4);
        set_default_fade_in(Duration::from_millis(10));
        set_default_fade_out(Duration::from_millis(20));
        let toast = Toast::text("x", ToastDuration::SHORT);
        previous.install();

        assert_abs_diff_eq!(toast.content_opacity().value(), 0.4);
        assert_eq!(toast.fade_in(), Duration::from_millis(10));
        assert_eq!(toast.fade_out(), Duration::from_millis(20));
    }

    #[test]
    fn displayed_states() {
        assert!(!ToastState::Idle.is_displayed());
        assert!(!ToastState::Queued.is_displayed());
        assert!(ToastState::FadingIn.is_displayed());
        assert!(ToastState::Visible.is_displayed());
        assert!(ToastState::FadingOut.is_displayed());
    }

    #[test]
    fn display_includes_id_and_content() {
        let toast = Toast::text("hi", ToastDuration::SHORT);
        assert_eq!(
            toast.to_string(),
            format!("Toast{{id={}, content=\"hi\"}}", toast.id())
        );
    }
}
