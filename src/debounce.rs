//! Cancellable timers and latest-result-wins bookkeeping for async callers.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Delay applied to search input before a query is sent.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Runs a task after a quiet period; scheduling again cancels whatever is pending.
///
/// Must be used from within a Tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancels the pending task, including one already past its timer, and
    /// schedules `task` to run once the delay elapses.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a scheduled task has not finished yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Order of a request within a [`LatestSlot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug)]
struct SlotState<T> {
    issued: u64,
    accepted: u64,
    value: Option<T>,
}

/// Holds the most recent result of a stream of requests.
///
/// Each request takes a [`Ticket`] before it starts; a response is stored only
/// when its ticket is newer than the one behind the stored value, so a slow
/// early response can never replace a fresher one.
#[derive(Debug)]
pub struct LatestSlot<T> {
    state: Mutex<SlotState<T>>,
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(SlotState {
                issued: 0,
                accepted: 0,
                value: None,
            }),
        }
    }
}

impl<T> LatestSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SlotState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn issue(&self) -> Ticket {
        let mut state = self.lock();
        state.issued += 1;
        Ticket(state.issued)
    }

    /// Stores `value` if `ticket` is newer than the last accepted one.
    pub fn offer(&self, ticket: Ticket, value: T) -> bool {
        let mut state = self.lock();
        if ticket.0 <= state.accepted {
            log::debug!("Discarding stale response #{}", ticket.0);
            return false;
        }
        state.accepted = ticket.0;
        state.value = Some(value);
        true
    }

    /// Whether no request was issued after `ticket`.
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.lock().issued == ticket.0
    }

    /// Whether `ticket` could still be accepted.
    pub fn is_fresh(&self, ticket: Ticket) -> bool {
        ticket.0 > self.lock().accepted
    }
}

impl<T: Clone> LatestSlot<T> {
    pub fn get(&self) -> Option<T> {
        self.lock().value.clone()
    }
}
