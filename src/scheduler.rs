// SPDX-License-Identifier: MPL-2.0
//! Single-slot admission for toasts.
//!
//! The `Scheduler` lets at most one toast be on screen at a time. Requests
//! arriving while the slot is taken wait in a bounded FIFO queue and are
//! handed the slot, oldest first, as the visible toast finishes.
//!
//! The slot flag and the queue sit behind one mutex, so admitting or queueing
//! a request is a single atomic step even when several toasters on different
//! threads share a scheduler.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crossbeam_channel::Sender;

use crate::config::defaults::QUEUE_CAPACITY;
use crate::toast::{Event, Message, ToastId};

/// A queued request for the display slot.
///
/// Carries the toast's id and the channel of the toaster that owns it, so the
/// slot can be handed back to the right UI thread.
#[derive(Debug, Clone)]
pub struct ToastRequest {
    id: ToastId,
    owner: Sender<Message>,
}

impl ToastRequest {
    /// Creates a request for `id`, owned by the toaster listening on `owner`.
    #[must_use]
    pub fn new(id: ToastId, owner: Sender<Message>) -> Self {
        Self { id, owner }
    }

    /// Returns the requested toast's id.
    #[must_use]
    pub fn id(&self) -> ToastId {
        self.id
    }

    /// Returns the owning toaster's channel.
    #[must_use]
    pub fn owner(&self) -> &Sender<Message> {
        &self.owner
    }

    /// Returns true if the request belongs to the toaster listening on `sender`.
    #[must_use]
    pub fn is_owned_by(&self, sender: &Sender<Message>) -> bool {
        self.owner.same_channel(sender)
    }
}

impl PartialEq for ToastRequest {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ToastRequest {}

/// Outcome of [`Scheduler::admit_or_enqueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The slot was free and is now held by the request.
    Admitted,
    /// The slot is taken; the request waits in the queue.
    Queued,
    /// The slot is taken and the queue is full; the request was discarded.
    Dropped,
}

/// Outcome of [`Scheduler::hand_over`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handover {
    /// Nobody was waiting; the slot is free.
    Freed,
    /// The slot went to a toast of another toaster, which was notified.
    Remote(ToastId),
    /// The slot went to a toast of the releasing toaster, which must show it
    /// or hand the slot over again.
    Local(ToastRequest),
}

#[derive(Debug)]
struct SchedulerState {
    currently_showing: bool,
    queue: VecDeque<ToastRequest>,
    capacity: usize,
}

impl SchedulerState {
    fn push(&mut self, request: ToastRequest) -> bool {
        if self.queue.len() >= self.capacity {
            log::error!(
                "toast queue exceeded its capacity ({}), dropping toast {}",
                self.capacity,
                request.id
            );
            return false;
        }
        log::debug!("toast enqueued: {}", request.id);
        self.queue.push_back(request);
        true
    }
}

/// Shared admission state: the "currently showing" flag plus the wait queue.
///
/// Cloning is cheap and every clone refers to the same state.
#[derive(Debug, Clone)]
pub struct Scheduler {
    state: Arc<Mutex<SchedulerState>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Creates a scheduler with the default queue capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(QUEUE_CAPACITY)
    }

    /// Creates a scheduler whose queue holds at most `capacity` requests.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(SchedulerState {
                currently_showing: false,
                queue: VecDeque::with_capacity(capacity),
                capacity,
            })),
        }
    }

    /// Returns the process-wide scheduler, creating it on first use.
    ///
    /// It lives for the rest of the process.
    #[must_use]
    pub fn global() -> Scheduler {
        static GLOBAL: OnceLock<Scheduler> = OnceLock::new();
        GLOBAL.get_or_init(Scheduler::new).clone()
    }

    /// Takes the display slot if it is free.
    ///
    /// Returns false if another toast already holds it.
    pub fn try_admit(&self) -> bool {
        let mut state = self.lock();
        if state.currently_showing {
            false
        } else {
            state.currently_showing = true;
            true
        }
    }

    /// Appends a request to the wait queue.
    ///
    /// Returns false, and logs an error, if the queue is full. A dropped
    /// request is never shown.
    pub fn enqueue(&self, request: ToastRequest) -> bool {
        self.lock().push(request)
    }

    /// Takes the slot if it is free, otherwise queues the request.
    ///
    /// Both steps happen under one lock, so a concurrent [`release`](Self::release)
    /// cannot slip between them.
    pub fn admit_or_enqueue(&self, request: ToastRequest) -> Admission {
        let mut state = self.lock();
        if !state.currently_showing {
            state.currently_showing = true;
            Admission::Admitted
        } else if state.push(request) {
            Admission::Queued
        } else {
            Admission::Dropped
        }
    }

    /// Called when the visible toast has finished hiding.
    ///
    /// Returns the oldest waiting request, which now holds the slot, or
    /// `None` after freeing the slot if nobody is waiting.
    pub fn release(&self) -> Option<ToastRequest> {
        let mut state = self.lock();
        let next = state.queue.pop_front();
        if next.is_none() {
            state.currently_showing = false;
        }
        next
    }

    /// Passes the slot held by the toaster listening on `releaser` to the
    /// oldest waiter.
    ///
    /// A waiter of another toaster is notified while the lock is held, so a
    /// toaster shutting down through [`remove_owned_by`](Self::remove_owned_by)
    /// either still finds the notification on its channel or no longer has
    /// requests in the queue. Waiters whose toaster is gone are skipped.
    pub fn hand_over(&self, releaser: &Sender<Message>) -> Handover {
        let mut state = self.lock();
        while let Some(request) = state.queue.pop_front() {
            log::debug!("toast unqueued: {}", request.id);
            if request.is_owned_by(releaser) {
                return Handover::Local(request);
            }
            if request.owner.send(Event::Admitted(request.id).into()).is_ok() {
                return Handover::Remote(request.id);
            }
            log::warn!("owner of toast {} is gone, passing the slot on", request.id);
        }
        state.currently_showing = false;
        Handover::Freed
    }

    /// Removes every waiting request without touching the visible toast.
    ///
    /// Each owner is told its toast was withdrawn. Returns the number removed.
    pub fn clear_waiting(&self) -> usize {
        let drained = self.drain_waiting();
        let count = drained.len();
        for request in drained {
            // Owners that are gone have nothing to update.
            let _ = request.owner.send(Event::Withdrawn(request.id).into());
        }
        count
    }

    /// Removes and returns every waiting request, oldest first.
    #[must_use]
    pub fn drain_waiting(&self) -> Vec<ToastRequest> {
        self.lock().queue.drain(..).collect()
    }

    /// Removes the waiting requests owned by the toaster listening on `owner`.
    ///
    /// Returns the number removed.
    pub fn remove_owned_by(&self, owner: &Sender<Message>) -> usize {
        let mut state = self.lock();
        let before = state.queue.len();
        state.queue.retain(|request| !request.is_owned_by(owner));
        before - state.queue.len()
    }

    /// Returns true while a toast holds the display slot.
    #[must_use]
    pub fn is_showing(&self) -> bool {
        self.lock().currently_showing
    }

    /// Returns the number of waiting requests.
    #[must_use]
    pub fn waiting(&self) -> usize {
        self.lock().queue.len()
    }

    /// Returns the maximum number of waiting requests.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.lock().capacity
    }

    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
