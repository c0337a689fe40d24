use crypto_dashboard_wasm::application::{
    Dashboard, FetchState, MarketDataFetcher, PreferenceStore, RefreshOutcome, RefreshScheduler, RetryPolicy,
};
use crypto_dashboard_wasm::domain::errors::{FetchError, FetchResult};
use crypto_dashboard_wasm::domain::market_data::{Asset, MarketDataRepository};
use crypto_dashboard_wasm::infrastructure::storage::MemoryStorage;
use crypto_dashboard_wasm::time_utils::Timer;
use futures::channel::oneshot;
use futures::executor::{LocalPool, block_on};
use futures::poll;
use futures::task::LocalSpawnExt;
use std::cell::{Cell, RefCell};
use std::pin::pin;
use std::rc::Rc;
use std::time::Duration;

#[derive(Default, Clone)]
struct RecordingTimer {
    sleeps: Rc<RefCell<Vec<Duration>>>,
}

impl Timer for RecordingTimer {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}

struct NoDelay;

impl Timer for NoDelay {
    async fn sleep(&self, _duration: Duration) {}
}

#[derive(Default, Clone)]
struct FailingRepository {
    calls: Rc<Cell<u32>>,
}

impl MarketDataRepository for FailingRepository {
    async fn fetch_assets(&self) -> FetchResult<Vec<Asset>> {
        self.calls.set(self.calls.get() + 1);
        Err(FetchError::Status { code: 503, text: "Service Unavailable".into() })
    }
}

/// Blocks its first call until the gate opens
#[derive(Clone)]
struct GatedRepository {
    gate: Rc<RefCell<Option<oneshot::Receiver<()>>>>,
    calls: Rc<Cell<u32>>,
}

impl GatedRepository {
    fn gated() -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        let repo = Self { gate: Rc::new(RefCell::new(Some(rx))), calls: Rc::default() };
        (repo, tx)
    }
}

impl MarketDataRepository for GatedRepository {
    async fn fetch_assets(&self) -> FetchResult<Vec<Asset>> {
        self.calls.set(self.calls.get() + 1);
        let gate = self.gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(vec![Asset::new("bitcoin", "Bitcoin", "btc").with_price(65_000.0).with_market_cap(1.0e12)])
    }
}

#[test]
fn cycle_gives_up_after_max_retries_plus_one_attempts() {
    let repo = FailingRepository::default();
    let timer = RecordingTimer::default();
    let fetcher = MarketDataFetcher::new(repo.clone(), timer.clone(), RetryPolicy::default());

    let err = block_on(fetcher.fetch()).unwrap_err();
    assert_eq!(
        err,
        FetchError::Exhausted { attempts: 4, last_error: "HTTP error! status: 503 Service Unavailable".into() }
    );
    assert_eq!(repo.calls.get(), 4);
    assert_eq!(*timer.sleeps.borrow(), vec![Duration::from_secs(5); 3]);
    assert!(matches!(fetcher.state(), FetchState::Failed { attempts: 4, .. }));

    // the next cycle gets a fresh retry budget
    block_on(fetcher.fetch()).unwrap_err();
    assert_eq!(repo.calls.get(), 8);
}

#[test]
fn overlapping_fetch_is_dropped_without_network() {
    let (repo, open_gate) = GatedRepository::gated();
    let fetcher = MarketDataFetcher::new(repo.clone(), NoDelay, RetryPolicy::default());

    block_on(async {
        let mut first = pin!(fetcher.fetch());
        assert!(poll!(first.as_mut()).is_pending());
        assert!(fetcher.is_in_flight());

        assert_eq!(fetcher.fetch().await, Err(FetchError::InFlight));
        assert_eq!(repo.calls.get(), 1);

        open_gate.send(()).unwrap();
        let snapshot = first.await.unwrap();
        assert_eq!(snapshot.cycle(), 1);
    });
    assert!(!fetcher.is_in_flight());
}

#[test]
fn scheduler_ticks_during_fetch_do_not_reach_network() {
    let (repo, open_gate) = GatedRepository::gated();
    let fetcher = MarketDataFetcher::new(repo.clone(), NoDelay, RetryPolicy::default());
    let dashboard = Rc::new(Dashboard::new(fetcher, PreferenceStore::new(MemoryStorage::default(), 5)));
    let outcomes = Rc::new(RefCell::new(Vec::new()));

    let mut pool = LocalPool::new();
    let spawner = pool.spawner();
    let scheduler = RefreshScheduler::new(Duration::from_secs(60)).with_tick_limit(3);
    pool.run_until(scheduler.run(&NoDelay, |_tick| {
        let dashboard = dashboard.clone();
        let outcomes = outcomes.clone();
        spawner
            .spawn_local(async move {
                let outcome = dashboard.refresh().await;
                outcomes.borrow_mut().push(outcome);
            })
            .unwrap();
    }));
    pool.run_until_stalled();

    assert_eq!(repo.calls.get(), 1);
    assert_eq!(*outcomes.borrow(), vec![RefreshOutcome::Skipped, RefreshOutcome::Skipped]);

    open_gate.send(()).unwrap();
    pool.run_until_stalled();
    assert_eq!(outcomes.borrow().last(), Some(&RefreshOutcome::Updated { cycle: 1, assets: 1 }));
    assert_eq!(dashboard.view().rows.len(), 1);
}
