use crate::application::config::RetryPolicy;
use crate::domain::errors::{FetchError, FetchResult};
use crate::domain::logging::{LogComponent, get_time_provider};
use crate::domain::market_data::{AssetSnapshot, MarketDataRepository};
use crate::time_utils::Timer;
use crate::{log_debug, log_error, log_info, log_warn};
use std::cell::RefCell;
use std::time::Duration;

const COMPONENT: LogComponent = LogComponent::Application("Fetcher");

/// Where the current fetch cycle stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    /// Attempt `attempt` (1-based) is waiting on the network
    Fetching { attempt: u32 },
    /// Retry number `retry` is scheduled after the fixed delay
    RetryWaiting { retry: u32 },
    Failed { attempts: u32, reason: String },
    Succeeded { at: u64, cycle: u64 },
}

impl FetchState {
    /// Fetching or waiting to retry; new requests are dropped meanwhile
    pub fn is_in_flight(&self) -> bool {
        matches!(self, FetchState::Fetching { .. } | FetchState::RetryWaiting { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter { retry: u32, delay: Duration },
    GiveUp { attempts: u32 },
}

/// Retry state machine, independent of any timer or transport.
#[derive(Debug, Clone)]
pub struct FetchCycle {
    state: FetchState,
    policy: RetryPolicy,
    cycles_started: u64,
}

impl FetchCycle {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { state: FetchState::Idle, policy, cycles_started: 0 }
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Starts a new cycle at attempt 1. `None` while one is in flight.
    pub fn begin(&mut self) -> Option<u64> {
        if self.state.is_in_flight() {
            return None;
        }
        self.cycles_started += 1;
        self.state = FetchState::Fetching { attempt: 1 };
        Some(self.cycles_started)
    }

    pub fn record_failure(&mut self, error: &FetchError) -> RetryDecision {
        let attempt = match self.state {
            FetchState::Fetching { attempt } => attempt,
            _ => 1,
        };
        let retries_used = attempt - 1;
        if error.is_retryable() && retries_used < self.policy.max_retries {
            let retry = retries_used + 1;
            self.state = FetchState::RetryWaiting { retry };
            RetryDecision::RetryAfter { retry, delay: self.policy.delay }
        } else {
            self.state = FetchState::Failed { attempts: attempt, reason: error.to_string() };
            RetryDecision::GiveUp { attempts: attempt }
        }
    }

    /// Delay elapsed: the next attempt starts.
    pub fn resume(&mut self) {
        if let FetchState::RetryWaiting { retry } = self.state {
            self.state = FetchState::Fetching { attempt: retry + 1 };
        }
    }

    pub fn record_success(&mut self, at: u64) {
        self.state = FetchState::Succeeded { at, cycle: self.cycles_started };
    }

    /// Ends a cycle nobody is waiting on any more. `false` when none was running.
    pub fn abandon(&mut self) -> bool {
        let attempts = match self.state {
            FetchState::Fetching { attempt } => attempt,
            FetchState::RetryWaiting { retry } => retry,
            _ => return false,
        };
        self.state = FetchState::Failed { attempts, reason: CANCELLED.to_string() };
        true
    }
}

const CANCELLED: &str = "fetch cancelled";

/// Ends the cycle if the fetch future is dropped before it finishes.
struct InFlightGuard<'a> {
    cycle: &'a RefCell<FetchCycle>,
    observer: &'a RefCell<Option<StateObserver>>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let Ok(mut cycle) = self.cycle.try_borrow_mut() else {
            return;
        };
        if !cycle.abandon() {
            return;
        }
        let state = cycle.state().clone();
        drop(cycle);
        log_warn!(COMPONENT, "⏹️ Fetch dropped mid-cycle; guard released");
        if let Ok(observer) = self.observer.try_borrow() {
            if let Some(observer) = observer.as_ref() {
                observer(&state);
            }
        }
    }
}

type StateObserver = Box<dyn Fn(&FetchState)>;

/// Fetches the market listing with a single in-flight guard and bounded,
/// fixed-delay retry.
pub struct MarketDataFetcher<R, T> {
    repository: R,
    timer: T,
    cycle: RefCell<FetchCycle>,
    observer: RefCell<Option<StateObserver>>,
}

impl<R: MarketDataRepository, T: Timer> MarketDataFetcher<R, T> {
    pub fn new(repository: R, timer: T, policy: RetryPolicy) -> Self {
        Self {
            repository,
            timer,
            cycle: RefCell::new(FetchCycle::new(policy)),
            observer: RefCell::new(None),
        }
    }

    /// Called after every state transition, e.g. to drive a loading indicator.
    pub fn set_observer(&self, observer: impl Fn(&FetchState) + 'static) {
        *self.observer.borrow_mut() = Some(Box::new(observer));
    }

    pub fn state(&self) -> FetchState {
        self.cycle.borrow().state().clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.cycle.borrow().state().is_in_flight()
    }

    /// Runs one fetch cycle.
    ///
    /// Returns [`FetchError::InFlight`] without touching the network when a
    /// previous cycle, including its retry waits, has not finished. Dropping
    /// the returned future ends its cycle as failed.
    pub async fn fetch(&self) -> FetchResult<AssetSnapshot> {
        let began = self.cycle.borrow_mut().begin();
        let Some(cycle_no) = began else {
            log_debug!(COMPONENT, "⏭️ Fetch request dropped: previous cycle still in flight");
            return Err(FetchError::InFlight);
        };
        let _guard = InFlightGuard { cycle: &self.cycle, observer: &self.observer };
        self.notify();

        loop {
            match self.repository.fetch_assets().await {
                Ok(assets) => {
                    let at = get_time_provider().current_timestamp();
                    self.cycle.borrow_mut().record_success(at);
                    self.notify();
                    let snapshot = AssetSnapshot::new(assets, cycle_no, at);
                    log_info!(COMPONENT, "✅ Cycle {} loaded {} assets", cycle_no, snapshot.len());
                    return Ok(snapshot);
                }
                Err(err) => {
                    log_warn!(COMPONENT, "Error fetching cryptocurrencies: {}", err);
                    let decision = self.cycle.borrow_mut().record_failure(&err);
                    self.notify();
                    match decision {
                        RetryDecision::RetryAfter { retry, delay } => {
                            let max_retries = self.cycle.borrow().policy.max_retries;
                            log_info!(
                                COMPONENT,
                                "Retrying in {} seconds... ({}/{})",
                                delay.as_secs(),
                                retry,
                                max_retries
                            );
                            self.timer.sleep(delay).await;
                            self.cycle.borrow_mut().resume();
                            self.notify();
                        }
                        RetryDecision::GiveUp { attempts } => {
                            log_error!(COMPONENT, "❌ Cycle {} failed after {} attempts", cycle_no, attempts);
                            return Err(FetchError::Exhausted { attempts, last_error: err.to_string() });
                        }
                    }
                }
            }
        }
    }

    fn notify(&self) {
        let state = self.state();
        if let Some(observer) = self.observer.borrow().as_ref() {
            observer(&state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::Asset;
    use futures::executor::block_on;
    use futures::future;
    use std::cell::Cell;

    fn policy() -> RetryPolicy {
        RetryPolicy { max_retries: 3, delay: Duration::from_secs(5) }
    }

    #[test]
    fn cycle_walks_retry_states() {
        let mut cycle = FetchCycle::new(policy());
        assert_eq!(cycle.begin(), Some(1));
        assert_eq!(cycle.state(), &FetchState::Fetching { attempt: 1 });

        let err = FetchError::Transport("offline".into());
        for retry in 1..=3 {
            assert_eq!(
                cycle.record_failure(&err),
                RetryDecision::RetryAfter { retry, delay: Duration::from_secs(5) }
            );
            assert!(cycle.state().is_in_flight());
            assert_eq!(cycle.begin(), None);
            cycle.resume();
            assert_eq!(cycle.state(), &FetchState::Fetching { attempt: retry + 1 });
        }
        assert_eq!(cycle.record_failure(&err), RetryDecision::GiveUp { attempts: 4 });
        assert!(!cycle.state().is_in_flight());
    }

    #[test]
    fn next_cycle_starts_from_zero_retries() {
        let mut cycle = FetchCycle::new(RetryPolicy { max_retries: 1, delay: Duration::ZERO });
        cycle.begin();
        let err = FetchError::Decode("bad json".into());
        cycle.record_failure(&err);
        cycle.resume();
        assert_eq!(cycle.record_failure(&err), RetryDecision::GiveUp { attempts: 2 });

        assert_eq!(cycle.begin(), Some(2));
        assert_eq!(cycle.state(), &FetchState::Fetching { attempt: 1 });
        assert!(matches!(cycle.record_failure(&err), RetryDecision::RetryAfter { retry: 1, .. }));
    }

    #[test]
    fn success_records_cycle() {
        let mut cycle = FetchCycle::new(policy());
        cycle.begin();
        cycle.record_success(42);
        assert_eq!(cycle.state(), &FetchState::Succeeded { at: 42, cycle: 1 });
        assert_eq!(cycle.begin(), Some(2));
    }

    /// First call fails (with `fail_first`) or never resolves; later calls succeed.
    #[derive(Default)]
    struct StallingRepository {
        calls: Cell<u32>,
        fail_first: bool,
    }

    impl MarketDataRepository for StallingRepository {
        async fn fetch_assets(&self) -> FetchResult<Vec<Asset>> {
            self.calls.set(self.calls.get() + 1);
            if self.calls.get() == 1 {
                if self.fail_first {
                    return Err(FetchError::Transport("offline".into()));
                }
                future::pending::<()>().await;
            }
            Ok(vec![Asset::new("bitcoin", "Bitcoin", "btc")])
        }
    }

    /// Never wakes, so a retry wait stays pending.
    struct StalledTimer;

    impl Timer for StalledTimer {
        async fn sleep(&self, _duration: Duration) {
            future::pending::<()>().await;
        }
    }

    struct NoDelay;

    impl Timer for NoDelay {
        async fn sleep(&self, _duration: Duration) {}
    }

    #[test]
    fn dropped_fetch_frees_the_next_cycle() {
        let fetcher = MarketDataFetcher::new(StallingRepository::default(), NoDelay, policy());
        {
            let mut pending = Box::pin(fetcher.fetch());
            block_on(async { assert!(futures::poll!(pending.as_mut()).is_pending()) });
            assert_eq!(fetcher.state(), FetchState::Fetching { attempt: 1 });
        }
        assert_eq!(fetcher.state(), FetchState::Failed { attempts: 1, reason: "fetch cancelled".into() });

        let snapshot = block_on(fetcher.fetch()).unwrap();
        assert_eq!(snapshot.cycle(), 2);
        assert_eq!(fetcher.repository.calls.get(), 2);
    }

    #[test]
    fn dropped_retry_wait_frees_the_next_cycle() {
        let repository = StallingRepository { fail_first: true, ..Default::default() };
        let fetcher = MarketDataFetcher::new(repository, StalledTimer, policy());
        let observed = std::rc::Rc::new(RefCell::new(Vec::new()));
        let sink = observed.clone();
        fetcher.set_observer(move |state| sink.borrow_mut().push(state.clone()));
        {
            let mut pending = Box::pin(fetcher.fetch());
            block_on(async { assert!(futures::poll!(pending.as_mut()).is_pending()) });
            assert_eq!(fetcher.state(), FetchState::RetryWaiting { retry: 1 });
        }
        assert!(!fetcher.is_in_flight());
        assert!(matches!(observed.borrow().last(), Some(FetchState::Failed { attempts: 1, .. })));

        assert!(block_on(fetcher.fetch()).is_ok());
        assert_eq!(fetcher.repository.calls.get(), 2);
    }

    #[test]
    fn abandon_ignores_finished_cycles() {
        let mut cycle = FetchCycle::new(policy());
        assert!(!cycle.abandon());
        cycle.begin();
        cycle.record_success(7);
        assert!(!cycle.abandon());
        assert_eq!(cycle.state(), &FetchState::Succeeded { at: 7, cycle: 1 });
    }
}
