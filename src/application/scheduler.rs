use crate::domain::logging::LogComponent;
use crate::log_debug;
use crate::time_utils::Timer;
use std::time::Duration;

/// Fires one tick at startup and then one per interval, forever.
///
/// The scheduler never waits for the work a tick starts; overlapping ticks
/// are dropped by the fetcher's in-flight guard.
#[derive(Debug, Clone, Copy)]
pub struct RefreshScheduler {
    interval: Duration,
    tick_limit: Option<u64>,
}

impl RefreshScheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval, tick_limit: None }
    }

    /// Stop after `ticks` ticks. Only for tests and embedding; the app never sets it.
    pub fn with_tick_limit(mut self, ticks: u64) -> Self {
        self.tick_limit = Some(ticks);
        self
    }

    /// Drives `on_tick(n)` starting with `n = 0`.
    ///
    /// `on_tick` must only *start* the refresh (e.g. `spawn_local`) and return.
    pub async fn run<T, F>(&self, timer: &T, mut on_tick: F)
    where
        T: Timer,
        F: FnMut(u64),
    {
        let mut tick = 0u64;
        loop {
            log_debug!(LogComponent::Application("Scheduler"), "⏰ Refresh tick {}", tick);
            on_tick(tick);
            tick += 1;
            if self.tick_limit.is_some_and(|limit| tick >= limit) {
                return;
            }
            timer.sleep(self.interval).await;
        }
    }
}
