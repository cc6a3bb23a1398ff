//! Cancellable delayed actions with last-call-wins semantics.
//!
//! Each [`Debouncer::trigger`] cancels the previously armed timer before
//! arming a new one, so a burst of triggers fires only the last action.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Armed,
    Cancelled,
    Fired,
}

#[derive(Debug)]
struct TimerShared {
    state: Mutex<TimerState>,
    wake: Condvar,
}

/// Handle to one armed timer.
#[derive(Debug)]
struct DebounceHandle {
    shared: Arc<TimerShared>,
}

impl DebounceHandle {
    /// Cancel the timer. Returns `true` if it had not fired yet.
    fn cancel(&self) -> bool {
        let mut state = self
            .shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *state == TimerState::Armed {
            *state = TimerState::Cancelled;
            self.shared.wake.notify_all();
            true
        } else {
            false
        }
    }

    /// Whether the timer is still waiting to fire.
    fn is_armed(&self) -> bool {
        *self
            .shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            == TimerState::Armed
    }
}

#[derive(Debug)]
struct Pending {
    handle: DebounceHandle,
    thread: thread::JoinHandle<()>,
}

/// Runs at most one pending action after a fixed delay.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<Pending>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Arm a timer that runs `action` after the delay, superseding any
    /// pending action.
    ///
    /// The action runs on a timer thread. It only runs if no later
    /// `trigger` or `cancel` happened before the delay elapsed.
    pub fn trigger<F>(&mut self, action: F) -> std::io::Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();

        let shared = Arc::new(TimerShared {
            state: Mutex::new(TimerState::Armed),
            wake: Condvar::new(),
        });
        let timer = Arc::clone(&shared);
        let delay = self.delay;

        let thread = thread::Builder::new()
            .name("preflight-debounce".to_string())
            .spawn(move || {
                let guard = timer.state.lock().unwrap_or_else(PoisonError::into_inner);
                let (mut state, _) = timer
                    .wake
                    .wait_timeout_while(guard, delay, |s| *s == TimerState::Armed)
                    .unwrap_or_else(PoisonError::into_inner);
                if *state != TimerState::Armed {
                    return;
                }
                *state = TimerState::Fired;
                drop(state);
                action();
            })?;

        self.pending = Some(Pending {
            handle: DebounceHandle { shared },
            thread,
        });
        Ok(())
    }

    /// Cancel the pending action, if any. Returns `true` if one was armed.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some_and(|p| p.handle.cancel())
    }

    /// Block until the pending action has run or been cancelled.
    ///
    /// Returns `true` if the action fired and completed.
    pub fn wait(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        let completed = pending.thread.join().is_ok();
        let fired = *pending
            .handle
            .shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            == TimerState::Fired;
        completed && fired
    }

    /// Whether an action is armed and has neither fired nor been cancelled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| p.handle.is_armed())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
