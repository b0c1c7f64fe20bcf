//! Shared run control: pause, resume, cancel and state observation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::BatchError;

/// Runner lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchState {
    Idle,
    Running,
    Paused,
    Completed,
    Cancelled,
}

impl BatchState {
    /// A batch is in progress
    pub fn is_active(&self) -> bool {
        matches!(self, BatchState::Running | BatchState::Paused)
    }
}

struct ControlInner {
    paused: AtomicBool,
    cancelled: AtomicBool,
    state: watch::Sender<BatchState>,
}

/// Cloneable handle for steering a running batch.
///
/// Pause and cancel are cooperative: the runner polls them between tasks and
/// never interrupts an AI call in flight.
#[derive(Clone)]
pub struct BatchControl {
    inner: Arc<ControlInner>,
}

impl BatchControl {
    pub fn new() -> Self {
        let (state, _) = watch::channel(BatchState::Idle);
        Self {
            inner: Arc::new(ControlInner {
                paused: AtomicBool::new(false),
                cancelled: AtomicBool::new(false),
                state,
            }),
        }
    }

    /// Stop starting new tasks until resumed
    pub fn pause(&self) {
        self.inner.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.inner.paused.store(false, Ordering::SeqCst);
    }

    /// Finish the in-flight task, then drop the rest of the queue
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.inner.paused.load(Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Current lifecycle state
    pub fn state(&self) -> BatchState {
        *self.inner.state.borrow()
    }

    /// Watch state transitions
    pub fn subscribe(&self) -> watch::Receiver<BatchState> {
        self.inner.state.subscribe()
    }

    /// Enter `Running` from any inactive state, clearing stale flags
    pub(crate) fn begin(&self) -> Result<(), BatchError> {
        let started = self.inner.state.send_if_modified(|state| {
            if state.is_active() {
                false
            } else {
                *state = BatchState::Running;
                true
            }
        });

        if !started {
            return Err(BatchError::AlreadyRunning);
        }

        self.inner.paused.store(false, Ordering::SeqCst);
        self.inner.cancelled.store(false, Ordering::SeqCst);
        Ok(())
    }

    pub(crate) fn set_state(&self, state: BatchState) {
        self.inner.state.send_replace(state);
    }

    /// Leave the active states
    pub(crate) fn finish(&self, state: BatchState) {
        self.inner.paused.store(false, Ordering::SeqCst);
        self.set_state(state);
    }
}

impl Default for BatchControl {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BatchControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchControl")
            .field("state", &self.state())
            .field("paused", &self.is_paused())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
