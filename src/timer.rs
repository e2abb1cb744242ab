// SPDX-License-Identifier: MPL-2.0
//! Deadline timers that deliver toast messages back to the UI thread.
//!
//! A timer never runs application code: when a deadline passes it only posts
//! the scheduled [`Message`] onto the owning toaster's channel. All state
//! transitions happen later, on the UI thread, when the toaster drains that
//! channel.
//!
//! Two implementations are provided:
//!
//! - [`ThreadTimer`]: a background thread sleeping until the next deadline.
//!   [`ThreadTimer::shared`] lazily starts one process-wide instance.
//! - [`ManualTimer`]: a virtual clock advanced explicitly, for hosts that
//!   replay time and for deterministic tests.

use std::cmp::{Ordering as CmpOrdering, Reverse};
use std::collections::BinaryHeap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use crate::toast::Message;

/// Name of the background timer thread.
pub const TIMER_THREAD_NAME: &str = "toast-timer";

/// Schedules delayed delivery of a [`Message`] to a UI-thread channel.
pub trait Timer: Send + Sync {
    /// Posts `message` to `target` once `delay` has elapsed, unless the
    /// returned task is cancelled first.
    fn schedule(&self, delay: Duration, target: Sender<Message>, message: Message) -> TimerTask;
}

/// Cancellation handle for a scheduled delivery.
///
/// Dropping the handle does not cancel the delivery.
#[derive(Debug, Clone)]
pub struct TimerTask {
    cancelled: Arc<AtomicBool>,
}

impl TimerTask {
    fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Prevents the message from being delivered. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true if [`cancel`](Self::cancel) was called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A pending delivery ordered by deadline, then by scheduling order.
struct Scheduled<D> {
    deadline: D,
    seq: u64,
    cancelled: Arc<AtomicBool>,
    target: Sender<Message>,
    message: Message,
}

impl<D> Scheduled<D> {
    fn deliver(self) {
        if self.cancelled.load(Ordering::SeqCst) {
            return;
        }
        // The receiving toaster may already be gone.
        if self.target.send(self.message).is_err() {
            log::trace!("timer target disconnected, dropping {:?}", self.message);
        }
    }
}

impl<D: Ord> PartialEq for Scheduled<D> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == CmpOrdering::Equal
    }
}

impl<D: Ord> Eq for Scheduled<D> {}

impl<D: Ord> PartialOrd for Scheduled<D> {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl<D: Ord> Ord for Scheduled<D> {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        self.deadline
            .cmp(&other.deadline)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Pops and returns every entry whose deadline is at or before `now`.
fn take_due<D: Ord + Copy>(
    pending: &mut BinaryHeap<Reverse<Scheduled<D>>>,
    now: D,
) -> Vec<Scheduled<D>> {
    let mut due = Vec::new();
    while pending
        .peek()
        .is_some_and(|Reverse(entry)| entry.deadline <= now)
    {
        if let Some(Reverse(entry)) = pending.pop() {
            due.push(entry);
        }
    }
    due
}

// =============================================================================
// ThreadTimer
// =============================================================================

/// Timer backed by a dedicated background thread.
///
/// The thread exits once every handle to the timer has been dropped.
/// Deliveries still pending at that point are discarded.
#[derive(Debug, Clone)]
pub struct ThreadTimer {
    command_tx: Sender<Scheduled<Instant>>,
}

impl ThreadTimer {
    /// Starts a new timer thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the operating system refuses to spawn the thread.
    pub fn spawn() -> io::Result<Self> {
        let (command_tx, command_rx) = unbounded();
        thread::Builder::new()
            .name(TIMER_THREAD_NAME.to_string())
            .spawn(move || Self::timer_loop(&command_rx))?;
        Ok(Self { command_tx })
    }

    /// Returns the process-wide timer, starting its thread on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer thread could not be spawned.
    pub fn shared() -> io::Result<Arc<ThreadTimer>> {
        static SHARED: OnceLock<Arc<ThreadTimer>> = OnceLock::new();

        if let Some(timer) = SHARED.get() {
            return Ok(Arc::clone(timer));
        }
        let timer = Arc::new(Self::spawn()?);
        // If another thread won the race, our timer is dropped here and its
        // thread exits on disconnect.
        Ok(Arc::clone(SHARED.get_or_init(|| timer)))
    }

    /// The main loop running on the timer thread.
    fn timer_loop(command_rx: &Receiver<Scheduled<Instant>>) {
        let mut pending: BinaryHeap<Reverse<Scheduled<Instant>>> = BinaryHeap::new();

        loop {
            let next_deadline = pending.peek().map(|Reverse(entry)| entry.deadline);
            let received = match next_deadline {
                Some(deadline) => command_rx.recv_deadline(deadline),
                None => command_rx
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };

            match received {
                Ok(entry) => pending.push(Reverse(entry)),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            for entry in take_due(&mut pending, Instant::now()) {
                entry.deliver();
            }
        }
    }
}

impl Timer for ThreadTimer {
    fn schedule(&self, delay: Duration, target: Sender<Message>, message: Message) -> TimerTask {
        static SEQ: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

        let task = TimerTask::new();
        let entry = Scheduled {
            deadline: Instant::now() + delay,
            seq: SEQ.fetch_add(1, Ordering::Relaxed),
            cancelled: Arc::clone(&task.cancelled),
            target,
            message,
        };
        if self.command_tx.send(entry).is_err() {
            log::error!("toast timer thread is gone, {message:?} will never fire");
        }
        task
    }
}

// =============================================================================
// ManualTimer
// =============================================================================

/// Timer driven by an explicit virtual clock.
///
/// Nothing fires until [`advance`](Self::advance) moves the clock past a
/// deadline. Entries sharing a deadline fire in scheduling order.
#[derive(Default)]
pub struct ManualTimer {
    state: Mutex<ManualState>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    seq: u64,
    pending: BinaryHeap<Reverse<Scheduled<Duration>>>,
}

impl ManualTimer {
    /// Creates a timer with its clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the virtual time elapsed since creation.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Returns the number of deliveries not yet fired or cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.lock()
            .pending
            .iter()
            .filter(|Reverse(entry)| !entry.cancelled.load(Ordering::SeqCst))
            .count()
    }

    /// Moves the clock forward and delivers every message that became due.
    ///
    /// Returns the number of messages delivered.
    pub fn advance(&self, by: Duration) -> usize {
        let due = {
            let mut state = self.lock();
            state.now += by;
            let now = state.now;
            take_due(&mut state.pending, now)
        };
        let mut delivered = 0;
        for entry in due {
            if !entry.cancelled.load(Ordering::SeqCst) {
                delivered += 1;
            }
            entry.deliver();
        }
        delivered
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Timer for ManualTimer {
    fn schedule(&self, delay: Duration, target: Sender<Message>, message: Message) -> TimerTask {
        let task = TimerTask::new();
        let mut state = self.lock();
        let entry = Scheduled {
            deadline: state.now + delay,
            seq: state.seq,
            cancelled: Arc::clone(&task.cancelled),
            target,
            message,
        };
        state.seq += 1;
        state.pending.push(Reverse(entry));
        task
    }
}
