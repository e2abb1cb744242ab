// SPDX-License-Identifier: MPL-2.0
//! Toast lifecycle management.
//!
//! The `Toaster` lives on the UI thread. It owns submitted toasts, asks the
//! [`Scheduler`] for the display slot, drives the host's popups and fades,
//! and arms auto-hide timers. Everything that completes asynchronously
//! (timers, animations, slot hand-overs from other toasters) arrives as a
//! [`Message`] on the toaster's channel and is applied by
//! [`Toaster::process_pending`] or [`Toaster::handle_next`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use iced_core::Size;

use super::placement::{self, Resolved, Target};
use super::{Toast, ToastId, ToastState};
use crate::domain::toast::Opacity;
use crate::error::{Error, Result};
use crate::host::{AnimationDone, Fade, Host};
use crate::scheduler::{Admission, Handover, Scheduler, ToastRequest};
use crate::timer::{ThreadTimer, Timer, TimerTask};

/// A request application code may post to a toaster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    /// Hide a toast, as if [`Toaster::hide`] was called.
    Hide(ToastId),
    /// The host laid out a shown toast at a new size.
    Resized { id: ToastId, size: Size },
}

/// A message on a toaster's channel.
///
/// Only requests can be built outside the crate (through
/// `From<Request>`). Timer, animation and slot notifications are created by
/// the toaster itself and are opaque to hosts and timers that carry them.
///
/// ```compile_fail
/// use toast_relay::toast::Message;
///
/// // Slot notifications cannot be forged.
/// let forged = Message::Admitted(toast_relay::ToastId::new());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Message(pub(crate) Event);

/// What a [`Message`] carries.
///
/// `cycle` numbers identify one display of a toast; events from an older
/// cycle are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Event {
    Request(Request),
    /// The auto-hide deadline of a toast passed.
    AutoHide { id: ToastId, cycle: u64 },
    FadeInFinished { id: ToastId, cycle: u64 },
    FadeOutFinished { id: ToastId, cycle: u64 },
    /// Another toaster released the display slot to this queued toast.
    Admitted(ToastId),
    /// The queued toast was removed from the wait queue.
    Withdrawn(ToastId),
}

impl From<Event> for Message {
    fn from(event: Event) -> Self {
        Self(event)
    }
}

impl From<Request> for Message {
    fn from(request: Request) -> Self {
        Self(Event::Request(request))
    }
}

/// Thread-safe handle for posting requests to a toaster's UI thread.
#[derive(Debug, Clone)]
pub struct ToastSender {
    tx: Sender<Message>,
}

impl ToastSender {
    /// Asks the toaster to hide `id`. Returns false if the toaster is gone.
    pub fn hide(&self, id: ToastId) -> bool {
        self.send(Request::Hide(id))
    }

    /// Reports a new measured size for a shown toast.
    pub fn resized(&self, id: ToastId, size: Size) -> bool {
        self.send(Request::Resized { id, size })
    }

    /// Posts a request. Returns false if the toaster is gone.
    pub fn send(&self, request: Request) -> bool {
        self.tx.send(request.into()).is_ok()
    }
}

struct Entry<H: Host> {
    toast: Toast<H::Content>,
    target: Target<H::Window, H::Anchor>,
    /// Set while the toast is displayed.
    shown: Option<Resolved<H::Window, H::Anchor>>,
    cycle: u64,
    auto_hide: Option<TimerTask>,
}

impl<H: Host> Entry<H> {
    fn cancel_auto_hide(&mut self) {
        if let Some(task) = self.auto_hide.take() {
            task.cancel();
        }
    }
}

/// Drives toasts through their lifecycle on one UI thread.
pub struct Toaster<H: Host> {
    host: H,
    scheduler: Scheduler,
    timer: Arc<dyn Timer>,
    entries: HashMap<ToastId, Entry<H>>,
    sender: Sender<Message>,
    receiver: Receiver<Message>,
}

impl<H: Host> Toaster<H> {
    /// Creates a toaster using the process-wide scheduler and timer thread.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the timer thread could not be started.
    pub fn new(host: H) -> Result<Self> {
        let timer: Arc<dyn Timer> = ThreadTimer::shared()?;
        Ok(Self::with_parts(host, Scheduler::global(), timer))
    }

    /// Creates a toaster with an explicit scheduler and timer.
    pub fn with_parts(host: H, scheduler: Scheduler, timer: Arc<dyn Timer>) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            host,
            scheduler,
            timer,
            entries: HashMap::new(),
            sender,
            receiver,
        }
    }

    /// Submits a toast for display on `target`.
    ///
    /// The toast is shown at once if no other toast holds the display slot,
    /// queued otherwise. If the queue is full the toast is dropped silently
    /// (an error is logged) and stays [`Idle`](ToastState::Idle).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvableTarget`] if the target window or anchor
    /// cannot be resolved. Nothing is displayed or queued in that case.
    pub fn request_show(
        &mut self,
        mut toast: Toast<H::Content>,
        target: Target<H::Window, H::Anchor>,
    ) -> Result<ToastId> {
        let id = toast.id();
        placement::resolve(&self.host, &target, toast.auto_center(), toast.offset())
            .map_err(Error::UnresolvableTarget)?;

        let request = ToastRequest::new(id, self.sender.clone());
        match self.scheduler.admit_or_enqueue(request) {
            Admission::Admitted => {
                self.insert(toast, target);
                if !self.start_display(id) {
                    self.pass_slot();
                }
            }
            Admission::Queued => {
                toast.set_state(ToastState::Queued);
                self.insert(toast, target);
            }
            Admission::Dropped => {}
        }
        Ok(id)
    }

    /// Fades a displayed toast out.
    ///
    /// Any pending auto-hide timer is cancelled. Hiding a toast that is
    /// queued, already fading out, or unknown does nothing else.
    pub fn hide(&mut self, id: ToastId) {
        let Some(entry) = self.entries.get_mut(&id) else {
            return;
        };
        log::trace!("hide toast: {}", entry.toast);
        entry.cancel_auto_hide();
        if !matches!(
            entry.toast.state(),
            ToastState::FadingIn | ToastState::Visible
        ) {
            return;
        }

        entry.toast.set_state(ToastState::FadingOut);
        let fade = Fade {
            from: None,
            to: Opacity::TRANSPARENT,
            duration: entry.toast.fade_out(),
        };
        let done = AnimationDone::new(
            self.sender.clone(),
            Event::FadeOutFinished {
                id,
                cycle: entry.cycle,
            },
        );
        self.host.animate_opacity(id, fade, done);
    }

    /// Removes every waiting toast from the scheduler's queue, including
    /// those owned by other toasters sharing it.
    ///
    /// The visible toast is unaffected. Returns the number removed.
    pub fn clear_waiting_toasts(&mut self) -> usize {
        let drained = self.scheduler.drain_waiting();
        let count = drained.len();
        for request in drained {
            if request.is_owned_by(&self.sender) {
                self.withdraw(request.id());
            } else {
                // Owners that are gone have nothing to update.
                let _ = request.owner().send(Event::Withdrawn(request.id()).into());
            }
        }
        count
    }

    /// Reports a new measured size for a shown toast.
    pub fn content_resized(&mut self, id: ToastId, size: Size) {
        self.recenter(id, size);
    }

    /// Applies a request on the UI thread.
    pub fn handle_request(&mut self, request: Request) {
        match request {
            Request::Hide(id) => self.hide(id),
            Request::Resized { id, size } => self.recenter(id, size),
        }
    }

    /// Applies one message taken from the channel.
    pub(crate) fn handle_message(&mut self, Message(event): Message) {
        match event {
            Event::Request(request) => self.handle_request(request),
            Event::AutoHide { id, cycle } => {
                let current = self.entries.get_mut(&id).filter(|entry| entry.cycle == cycle);
                if let Some(entry) = current {
                    if entry.auto_hide.take().is_some() {
                        self.hide(id);
                    }
                }
            }
            Event::FadeInFinished { id, cycle } => {
                if let Some(entry) = self.current_entry(id, cycle, ToastState::FadingIn) {
                    entry.toast.set_state(ToastState::Visible);
                }
            }
            Event::FadeOutFinished { id, cycle } => {
                if self
                    .current_entry(id, cycle, ToastState::FadingOut)
                    .is_some()
                {
                    self.finish_hide(id);
                }
            }
            Event::Admitted(id) => {
                if !self.admit_queued(id) {
                    self.pass_slot();
                }
            }
            Event::Withdrawn(id) => self.withdraw(id),
        }
    }

    /// Applies every message already waiting on the channel.
    ///
    /// Returns the number of messages handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.receiver.try_recv() {
            self.handle_message(message);
            handled += 1;
        }
        handled
    }

    /// Waits up to `timeout` for one message and applies it.
    ///
    /// Returns false if nothing arrived in time.
    pub fn handle_next(&mut self, timeout: Duration) -> bool {
        let Ok(message) = self.receiver.recv_timeout(timeout) else {
            return false;
        };
        self.handle_message(message);
        true
    }

    /// Returns a handle for posting requests from other threads.
    #[must_use]
    pub fn sender(&self) -> ToastSender {
        ToastSender {
            tx: self.sender.clone(),
        }
    }

    /// Returns the state of a toast submitted to this toaster.
    ///
    /// Toasts that were dropped, withdrawn or finished hiding are `Idle`.
    #[must_use]
    pub fn state(&self, id: ToastId) -> ToastState {
        self.entries
            .get(&id)
            .map_or(ToastState::Idle, |entry| entry.toast.state())
    }

    /// Returns the toast this toaster currently has on screen, if any.
    #[must_use]
    pub fn displayed(&self) -> Option<ToastId> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.toast.state().is_displayed())
            .map(|(id, _)| *id)
    }

    /// Returns the number of this toaster's toasts waiting for the slot.
    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.toast.state() == ToastState::Queued)
            .count()
    }

    /// Returns true if no toast is displayed or queued here.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    fn insert(&mut self, toast: Toast<H::Content>, target: Target<H::Window, H::Anchor>) {
        self.entries.insert(
            toast.id(),
            Entry {
                toast,
                target,
                shown: None,
                cycle: 0,
                auto_hide: None,
            },
        );
    }

    fn current_entry(
        &mut self,
        id: ToastId,
        cycle: u64,
        state: ToastState,
    ) -> Option<&mut Entry<H>> {
        self.entries
            .get_mut(&id)
            .filter(|entry| entry.cycle == cycle && entry.toast.state() == state)
    }

    /// Puts a toast that holds the slot on screen.
    ///
    /// On failure the toast is discarded and false is returned; the caller
    /// still holds the slot and must pass it on.
    fn start_display(&mut self, id: ToastId) -> bool {
        let Some(entry) = self.entries.get_mut(&id) else {
            return false;
        };

        let shown = match placement::resolve(
            &self.host,
            &entry.target,
            entry.toast.auto_center(),
            entry.toast.offset(),
        ) {
            Ok(resolved) => resolved,
            Err(reason) => {
                log::warn!("abandoning toast {id}: {reason}");
                self.entries.remove(&id);
                return false;
            }
        };
        let size = self
            .host
            .measured_size(id)
            .unwrap_or_else(|| self.host.preferred_size(entry.toast.content()));
        let Some(at) = placement::position(&self.host, &shown, size) else {
            log::warn!("abandoning toast {id}: display target disappeared");
            self.entries.remove(&id);
            return false;
        };
        if let Err(err) = self
            .host
            .show(id, entry.toast.content(), &shown.window, at)
        {
            log::warn!("abandoning toast {id}: {err}");
            self.entries.remove(&id);
            return false;
        }

        log::trace!("show toast: {}", entry.toast);
        entry.cycle += 1;
        let cycle = entry.cycle;
        entry.shown = Some(shown);
        entry.toast.set_state(ToastState::FadingIn);
        if let Some(delay) = entry.toast.duration().auto_hide_after() {
            entry.auto_hide = Some(self.timer.schedule(
                delay,
                self.sender.clone(),
                Event::AutoHide { id, cycle }.into(),
            ));
        }

        let fade = Fade {
            from: Some(Opacity::TRANSPARENT),
            to: entry.toast.content_opacity(),
            duration: entry.toast.fade_in(),
        };
        let done = AnimationDone::new(self.sender.clone(), Event::FadeInFinished { id, cycle });
        self.host.animate_opacity(id, fade, done);
        true
    }

    /// Shows a queued toast of ours that was handed the slot.
    fn admit_queued(&mut self, id: ToastId) -> bool {
        let queued = self
            .entries
            .get(&id)
            .is_some_and(|entry| entry.toast.state() == ToastState::Queued);
        queued && self.start_display(id)
    }

    fn finish_hide(&mut self, id: ToastId) {
        if let Some(mut entry) = self.entries.remove(&id) {
            entry.cancel_auto_hide();
            self.host.hide(id);
        }
        self.pass_slot();
    }

    /// Releases the display slot, handing it to the oldest waiter.
    ///
    /// Waiters of ours that can no longer be shown are skipped.
    fn pass_slot(&mut self) {
        while let Handover::Local(request) = self.scheduler.hand_over(&self.sender) {
            if self.admit_queued(request.id()) {
                return;
            }
        }
    }

    fn withdraw(&mut self, id: ToastId) {
        let queued = self
            .entries
            .get(&id)
            .is_some_and(|entry| entry.toast.state() == ToastState::Queued);
        if queued {
            self.entries.remove(&id);
        }
    }

    fn recenter(&mut self, id: ToastId, size: Size) {
        let Some(entry) = self.entries.get(&id) else {
            return;
        };
        let Some(shown) = entry.shown.as_ref() else {
            return;
        };
        if !shown.placement.follows_size() {
            return;
        }
        if let Some(at) = placement::position(&self.host, shown, size) {
            self.host.reposition(id, at);
        }
    }
}

impl<H: Host> Drop for Toaster<H> {
    fn drop(&mut self) {
        self.scheduler.remove_owned_by(&self.sender);
        let mut held_slot = false;
        for (id, mut entry) in self.entries.drain() {
            entry.cancel_auto_hide();
            if entry.toast.state().is_displayed() {
                held_slot = true;
                self.host.hide(id);
            }
        }
        // Our requests left the queue above, so a hand-over racing with this
        // drop has already been posted here.
        while let Ok(message) = self.receiver.try_recv() {
            if matches!(message, Message(Event::Admitted(_))) {
                held_slot = true;
            }
        }
        if held_slot {
            self.pass_slot();
        }
    }
}
