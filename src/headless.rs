// SPDX-License-Identifier: MPL-2.0
//! In-memory [`Host`] without a GUI.
//!
//! Windows and anchors are plain rectangles registered up front. Popups are
//! tracked in a map and host calls are recorded as [`HostEvent`]s, keeping
//! the most recent [`EVENT_LOG_CAPACITY`].
//! Opacity animations complete through a [`Timer`], so pairing the host with
//! a [`ManualTimer`](crate::timer::ManualTimer) replays a whole toast
//! timeline deterministically.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use iced_core::{Point, Rectangle, Size};

use crate::domain::toast::Opacity;
use crate::error::HostError;
use crate::host::{AnimationDone, Fade, Host};
use crate::timer::Timer;
use crate::toast::ToastId;

/// Size reported for every toast unless changed with
/// [`HeadlessHost::set_content_size`].
pub const DEFAULT_CONTENT_SIZE: Size = Size::new(240.0, 48.0);

/// Number of host calls kept in the event log; older ones are discarded.
pub const EVENT_LOG_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorId(pub u32);

/// A toast popup currently on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Popup {
    pub window: WindowId,
    pub at: Point,
    /// Target of the most recent fade.
    pub opacity: Opacity,
}

/// A recorded host call.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Shown {
        id: ToastId,
        window: WindowId,
        at: Point,
    },
    Moved {
        id: ToastId,
        at: Point,
    },
    Faded {
        id: ToastId,
        to: Opacity,
        duration: Duration,
    },
    Hidden(ToastId),
}

/// Headless display host.
pub struct HeadlessHost {
    timer: Arc<dyn Timer>,
    windows: HashMap<WindowId, Rectangle>,
    anchors: HashMap<AnchorId, (WindowId, Rectangle)>,
    next_handle: u32,
    content_size: Size,
    popups: HashMap<ToastId, Popup>,
    events: VecDeque<HostEvent>,
    failure: Option<HostError>,
}

impl HeadlessHost {
    /// Creates a host whose animations finish on `timer`.
    pub fn new(timer: Arc<dyn Timer>) -> Self {
        Self {
            timer,
            windows: HashMap::new(),
            anchors: HashMap::new(),
            next_handle: 0,
            content_size: DEFAULT_CONTENT_SIZE,
            popups: HashMap::new(),
            events: VecDeque::with_capacity(EVENT_LOG_CAPACITY),
            failure: None,
        }
    }

    /// Registers a window with the given screen bounds.
    pub fn add_window(&mut self, bounds: Rectangle) -> WindowId {
        let id = WindowId(self.next_handle());
        self.windows.insert(id, bounds);
        id
    }

    /// Registers an anchor node inside `window`.
    pub fn add_anchor(&mut self, window: WindowId, bounds: Rectangle) -> AnchorId {
        let id = AnchorId(self.next_handle());
        self.anchors.insert(id, (window, bounds));
        id
    }

    /// Closes a window. Popups already shown on it stay until hidden.
    pub fn close_window(&mut self, window: WindowId) {
        self.windows.remove(&window);
    }

    /// Changes the size reported for toast content.
    pub fn set_content_size(&mut self, size: Size) {
        self.content_size = size;
    }

    /// Makes the next [`Host::show`] call fail with `error`.
    pub fn fail_next_show(&mut self, error: HostError) {
        self.failure = Some(error);
    }

    /// Returns the popup of a shown toast.
    #[must_use]
    pub fn popup(&self, id: ToastId) -> Option<&Popup> {
        self.popups.get(&id)
    }

    /// Returns the number of popups on screen.
    #[must_use]
    pub fn on_screen(&self) -> usize {
        self.popups.len()
    }

    /// Returns the recorded host calls, oldest first.
    #[must_use]
    pub fn events(&self) -> &VecDeque<HostEvent> {
        &self.events
    }

    /// Removes and returns the recorded host calls.
    pub fn take_events(&mut self) -> Vec<HostEvent> {
        self.events.drain(..).collect()
    }

    fn record(&mut self, event: HostEvent) {
        if self.events.len() == EVENT_LOG_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    fn next_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl Host for HeadlessHost {
    type Content = String;
    type Window = WindowId;
    type Anchor = AnchorId;

    fn window_bounds(&self, window: &WindowId) -> Option<Rectangle> {
        self.windows.get(window).copied()
    }

    fn anchor_window(&self, anchor: &AnchorId) -> Option<WindowId> {
        self.anchors.get(anchor).map(|(window, _)| *window)
    }

    fn anchor_bounds(&self, anchor: &AnchorId) -> Option<Rectangle> {
        self.anchors.get(anchor).map(|(_, bounds)| *bounds)
    }

    fn preferred_size(&self, _content: &String) -> Size {
        self.content_size
    }

    fn measured_size(&self, id: ToastId) -> Option<Size> {
        self.popups.get(&id).map(|_| self.content_size)
    }

    fn show(
        &mut self,
        id: ToastId,
        content: &String,
        window: &WindowId,
        at: Point,
    ) -> Result<(), HostError> {
        if let Some(error) = self.failure.take() {
            return Err(error);
        }
        if !self.windows.contains_key(window) {
            return Err(HostError::WindowClosed);
        }
        log::info!("toast {id} shown at ({:.0}, {:.0}): {content}", at.x, at.y);
        self.popups.insert(
            id,
            Popup {
                window: *window,
                at,
                opacity: Opacity::TRANSPARENT,
            },
        );
        self.record(HostEvent::Shown {
            id,
            window: *window,
            at,
        });
        Ok(())
    }

    fn reposition(&mut self, id: ToastId, at: Point) {
        if let Some(popup) = self.popups.get_mut(&id) {
            popup.at = at;
            self.record(HostEvent::Moved { id, at });
        }
    }

    fn hide(&mut self, id: ToastId) {
        if self.popups.remove(&id).is_some() {
            log::info!("toast {id} hidden");
            self.record(HostEvent::Hidden(id));
        }
    }

    fn animate_opacity(&mut self, id: ToastId, fade: Fade, done: AnimationDone) {
        if let Some(popup) = self.popups.get_mut(&id) {
            popup.opacity = fade.to;
        }
        self.record(HostEvent::Faded {
            id,
            to: fade.to,
            duration: fade.duration,
        });
        let (target, message) = done.into_parts();
        self.timer.schedule(fade.duration, target, message);
    }
}
