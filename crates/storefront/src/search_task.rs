//! Debounced search scheduling.
//!
//! Each query change cancels the pending search task and schedules a new one
//! after a fixed delay. Only a task that is never cancelled commits its
//! result, so a superseded query cannot overwrite a newer one.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, instrument};

use crate::session::Session;

/// Schedules at most one pending search at a time.
#[derive(Debug)]
pub struct SearchScheduler {
    delay: Duration,
    pending: Mutex<Option<AbortHandle>>,
}

impl SearchScheduler {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending search and schedule `query` to commit after the
    /// delay.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(self, session))]
    pub fn schedule(&self, session: Arc<AsyncMutex<Session>>, query: String) -> JoinHandle<()> {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            session.lock().await.commit_search(&query);
        });

        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle.abort_handle());
        if let Some(previous) = previous {
            debug!("Cancelling superseded search");
            previous.abort();
        }

        handle
    }

    /// Cancel the pending search, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            previous.abort();
        }
    }
}
