use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

pub(crate) type SleepFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Source of time for timed waits, swapped out in tests.
pub(crate) trait Clock: Send + Sync + 'static {
    fn sleep(&self, duration: Duration) -> SleepFuture;
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TokioClock;

impl Clock for TokioClock {
    fn sleep(&self, duration: Duration) -> SleepFuture {
        Box::pin(tokio::time::sleep(duration))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerOutcome {
    Elapsed,
    Cancelled,
}

pub(crate) struct DelayTimer<C: Clock> {
    clock: Arc<C>,
    cancel: CancellationToken,
}

impl<C: Clock> DelayTimer<C> {
    pub(crate) fn new(clock: Arc<C>) -> Self {
        Self {
            clock,
            cancel: CancellationToken::new(),
        }
    }

    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for `duration` unless the timer is cancelled first. Once cancelled, every
    /// later wait returns immediately.
    pub(crate) async fn wait(&self, duration: Duration) -> TimerOutcome {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => TimerOutcome::Cancelled,
            _ = self.clock.sleep(duration) => TimerOutcome::Elapsed,
        }
    }
}
