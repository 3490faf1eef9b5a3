//! Trailing-edge debounce for schedule saves.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Runs at most one pending task after a quiet interval.
///
/// Scheduling a new task cancels the armed one, so a burst of calls
/// results in a single run after the last call. A task whose timer has
/// already fired runs to completion even if cancelled afterwards.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<CancellationToken>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancels any armed task and arms `task` to run after the delay.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let cancel = CancellationToken::new();
        let delay = self.delay;
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;

                () = token.cancelled() => {
                    tracing::trace!("debounced task superseded");
                }
                () = tokio::time::sleep(delay) => task.await,
            }
        });
        self.pending = Some(cancel);
    }

    /// Cancels the armed task, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    /// Forgets the armed task without cancelling it; it still fires.
    pub fn detach(&mut self) {
        self.pending = None;
    }

    /// Whether a task has been scheduled and neither cancelled nor detached.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}
