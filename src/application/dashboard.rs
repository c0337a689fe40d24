use crate::application::fetcher::{FetchState, MarketDataFetcher};
use crate::application::preference_store::{KeyValueStorage, PreferenceStore};
use crate::domain::chart::ChartPreview;
use crate::domain::errors::{FetchError, SelectionError};
use crate::domain::events::{DomainEvent, Intent};
use crate::domain::export::{ExportArtifact, export_comparison};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{Asset, AssetSnapshot, MarketDataRepository, MarketStats};
use crate::domain::preferences::{DisplayPreferences, PersistedState};
use crate::domain::selection::{FavoriteSet, SelectionSet, ToggleOutcome};
use crate::time_utils::Timer;
use crate::view_state::{ViewRow, ViewState};
use crate::{log_debug, log_info, log_warn};
use std::cell::RefCell;

const COMPONENT: LogComponent = LogComponent::Application("Dashboard");

/// What the presentation layer should do after an intent
#[derive(Debug, Clone, PartialEq)]
pub enum IntentOutcome {
    Rerender,
    Rejected(SelectionError),
    Export(ExportArtifact),
    ShowChart(ChartPreview),
    /// Nothing to do: the intent changed no state, or named an asset
    /// missing from the snapshot. Nothing is saved or re-rendered.
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Updated { cycle: u64, assets: usize },
    /// Dropped by the in-flight guard
    Skipped,
    /// Retries exhausted; the previous snapshot stays on screen
    Failed(FetchError),
}

/// Everything a render needs, detached from the controller
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub rows: Vec<ViewRow>,
    pub comparison: Vec<ViewRow>,
    pub favorites: Vec<Asset>,
    pub stats: MarketStats,
    pub preferences: DisplayPreferences,
    pub fetch_state: FetchState,
    pub last_update: Option<u64>,
    pub last_error: Option<String>,
    pub selection_count: usize,
    pub max_comparison: usize,
}

impl DashboardView {
    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }
}

fn changed(did_change: bool) -> IntentOutcome {
    if did_change {
        IntentOutcome::Rerender
    } else {
        IntentOutcome::Ignored
    }
}

#[derive(Debug)]
struct DashboardState {
    snapshot: AssetSnapshot,
    selection: SelectionSet,
    favorites: FavoriteSet,
    view: ViewState,
    last_error: Option<FetchError>,
}

type RenderListener = Box<dyn Fn()>;

/// Single owner of the application state.
///
/// All mutation goes through [`Dashboard::dispatch`] and [`Dashboard::refresh`];
/// every successful mutation is persisted before the listener is told to re-render.
pub struct Dashboard<R, T, K> {
    fetcher: MarketDataFetcher<R, T>,
    store: PreferenceStore<K>,
    state: RefCell<DashboardState>,
    listener: RefCell<Option<RenderListener>>,
}

impl<R, T, K> Dashboard<R, T, K>
where
    R: MarketDataRepository,
    T: Timer,
    K: KeyValueStorage,
{
    /// Restores persisted state; the snapshot starts empty until the first refresh.
    pub fn new(fetcher: MarketDataFetcher<R, T>, store: PreferenceStore<K>) -> Self {
        let PersistedState { selection, favorites, preferences } = store.load();
        let state = DashboardState {
            snapshot: AssetSnapshot::empty(),
            selection,
            favorites,
            view: ViewState::new(preferences),
            last_error: None,
        };
        Self { fetcher, store, state: RefCell::new(state), listener: RefCell::new(None) }
    }

    pub fn fetcher(&self) -> &MarketDataFetcher<R, T> {
        &self.fetcher
    }

    pub fn set_listener(&self, listener: impl Fn() + 'static) {
        *self.listener.borrow_mut() = Some(Box::new(listener));
    }

    /// Runs one fetch cycle and swaps in the new snapshot as a whole.
    pub async fn refresh(&self) -> RefreshOutcome {
        let outcome = match self.fetcher.fetch().await {
            Ok(snapshot) => {
                let outcome = RefreshOutcome::Updated { cycle: snapshot.cycle(), assets: snapshot.len() };
                let mut state = self.state.borrow_mut();
                state.snapshot = snapshot;
                state.last_error = None;
                outcome
            }
            Err(FetchError::InFlight) => return RefreshOutcome::Skipped,
            Err(err) => {
                self.state.borrow_mut().last_error = Some(err.clone());
                RefreshOutcome::Failed(err)
            }
        };
        self.request_render();
        outcome
    }

    pub fn dispatch(&self, intent: Intent) -> IntentOutcome {
        log_debug!(COMPONENT, "🎯 {} {:?}", intent.event_type(), intent);
        let persist = intent.mutates_preferences();

        let outcome = {
            let mut state = self.state.borrow_mut();
            match intent {
                Intent::ToggleComparison(id) => match state.selection.toggle(id.clone()) {
                    Ok(ToggleOutcome::Added) => {
                        log_info!(COMPONENT, "➕ {} added to comparison", id);
                        IntentOutcome::Rerender
                    }
                    Ok(ToggleOutcome::Removed) => IntentOutcome::Rerender,
                    Err(err) => {
                        log_warn!(COMPONENT, "{}", err);
                        IntentOutcome::Rejected(err)
                    }
                },
                Intent::ToggleFavorite(id) => {
                    state.favorites.toggle(id);
                    IntentOutcome::Rerender
                }
                Intent::SetSort(mode) => changed(state.view.set_sort_by(mode)),
                Intent::SetToggle { which, value } => changed(state.view.set_toggle(which, value)),
                Intent::SetTheme(theme) => changed(state.view.set_theme(theme)),
                Intent::ClearComparison => {
                    let had_any = !state.selection.is_empty();
                    state.selection.clear();
                    changed(had_any)
                }
                Intent::ExportComparison => {
                    IntentOutcome::Export(export_comparison(&state.selection, &state.snapshot))
                }
                Intent::ShowChart(id) => match state.snapshot.get(&id) {
                    Some(asset) => IntentOutcome::ShowChart(ChartPreview::for_asset(asset)),
                    None => IntentOutcome::Ignored,
                },
            }
        };

        if persist && outcome == IntentOutcome::Rerender {
            self.persist();
            self.request_render();
        }
        outcome
    }

    pub fn view(&self) -> DashboardView {
        let state = self.state.borrow();
        let rows = state.view.compute_view(&state.snapshot, &state.selection, &state.favorites);
        let comparison = state
            .snapshot
            .assets()
            .iter()
            .filter(|asset| state.selection.contains(&asset.id))
            .map(|asset| ViewRow {
                asset: asset.clone(),
                is_selected: true,
                is_favorite: state.favorites.contains(&asset.id),
                is_positive_change: asset.price_change_24h.is_positive(),
            })
            .collect();
        let favorites = state
            .snapshot
            .assets()
            .iter()
            .filter(|asset| state.favorites.contains(&asset.id))
            .cloned()
            .collect();

        DashboardView {
            rows,
            comparison,
            favorites,
            stats: state.view.compute_market_stats(&state.snapshot),
            preferences: state.view.preferences(),
            fetch_state: self.fetcher.state(),
            last_update: state.snapshot.fetched_at(),
            last_error: state.last_error.as_ref().map(ToString::to_string),
            selection_count: state.selection.len(),
            max_comparison: state.selection.capacity(),
        }
    }

    pub fn persisted_state(&self) -> PersistedState {
        let state = self.state.borrow();
        PersistedState {
            selection: state.selection.clone(),
            favorites: state.favorites.clone(),
            preferences: state.view.preferences(),
        }
    }

    fn persist(&self) {
        let snapshot = self.persisted_state();
        if let Err(err) = self.store.save(&snapshot) {
            log_warn!(COMPONENT, "⚠️ Preferences not saved: {}", err);
        }
    }

    fn request_render(&self) {
        if let Some(listener) = self.listener.borrow().as_ref() {
            listener();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::RetryPolicy;
    use crate::domain::errors::FetchResult;
    use crate::domain::market_data::AssetId;
    use crate::domain::preferences::{DisplayToggle, SortMode, Theme};
    use crate::infrastructure::storage::MemoryStorage;
    use futures::executor::block_on;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Default)]
    struct ScriptedRepository {
        responses: RefCell<VecDeque<FetchResult<Vec<Asset>>>>,
    }

    impl ScriptedRepository {
        fn push(&self, response: FetchResult<Vec<Asset>>) {
            self.responses.borrow_mut().push_back(response);
        }
    }

    impl MarketDataRepository for Rc<ScriptedRepository> {
        async fn fetch_assets(&self) -> FetchResult<Vec<Asset>> {
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Transport("no scripted response".into())))
        }
    }

    struct NoDelay;

    impl Timer for NoDelay {
        async fn sleep(&self, _duration: Duration) {}
    }

    fn assets() -> Vec<Asset> {
        vec![
            Asset::new("ethereum", "Ethereum", "eth").with_price(2.0).with_market_cap(200.0),
            Asset::new("bitcoin", "Bitcoin", "btc").with_price(50.0).with_market_cap(800.0),
        ]
    }

    fn dashboard(
        storage: Rc<MemoryStorage>,
    ) -> (Rc<ScriptedRepository>, Dashboard<Rc<ScriptedRepository>, NoDelay, Rc<MemoryStorage>>) {
        let repo = Rc::new(ScriptedRepository::default());
        let fetcher = MarketDataFetcher::new(
            repo.clone(),
            NoDelay,
            RetryPolicy { max_retries: 1, delay: Duration::ZERO },
        );
        (repo, Dashboard::new(fetcher, PreferenceStore::new(storage, 5)))
    }

    #[test]
    fn refresh_failure_keeps_previous_snapshot() {
        let (repo, dashboard) = dashboard(Rc::new(MemoryStorage::default()));
        repo.push(Ok(assets()));
        assert_eq!(block_on(dashboard.refresh()), RefreshOutcome::Updated { cycle: 1, assets: 2 });

        repo.push(Err(FetchError::Transport("down".into())));
        repo.push(Err(FetchError::Transport("down".into())));
        assert!(matches!(
            block_on(dashboard.refresh()),
            RefreshOutcome::Failed(FetchError::Exhausted { attempts: 2, .. })
        ));

        let view = dashboard.view();
        assert_eq!(view.rows.len(), 2);
        assert!(view.last_error.is_some());
        assert!((view.stats.btc_dominance - 80.0).abs() < 1e-9);
    }

    #[test]
    fn intents_persist_and_rerender() {
        let storage = Rc::new(MemoryStorage::default());
        let (_repo, dashboard) = dashboard(storage.clone());
        let renders = Rc::new(Cell::new(0));
        let counter = renders.clone();
        dashboard.set_listener(move || counter.set(counter.get() + 1));

        assert_eq!(dashboard.dispatch(Intent::ToggleFavorite(AssetId::from("bitcoin"))), IntentOutcome::Rerender);
        assert_eq!(dashboard.dispatch(Intent::SetSort(SortMode::Name)), IntentOutcome::Rerender);
        assert_eq!(
            dashboard.dispatch(Intent::SetToggle { which: DisplayToggle::Charts, value: true }),
            IntentOutcome::Rerender
        );
        assert_eq!(dashboard.dispatch(Intent::SetTheme(Theme::Light)), IntentOutcome::Rerender);
        assert_eq!(renders.get(), 4);

        assert_eq!(storage.get("favorites").as_deref(), Some(r#"["bitcoin"]"#));
        assert_eq!(storage.get("sortBy").as_deref(), Some("name"));
        assert_eq!(storage.get("showCharts").as_deref(), Some("true"));
        assert_eq!(storage.get("theme").as_deref(), Some("light"));

        let (_repo, reloaded) = self::dashboard(storage);
        assert_eq!(reloaded.persisted_state(), dashboard.persisted_state());
    }

    #[test]
    fn second_refresh_replaces_the_whole_snapshot() {
        let (repo, dashboard) = dashboard(Rc::new(MemoryStorage::default()));
        repo.push(Ok(vec![
            Asset::new("bitcoin", "Bitcoin", "btc").with_price(50.0).with_market_cap(800.0),
            Asset::new("ethereum", "Ethereum", "eth").with_price(2.0).with_market_cap(200.0),
        ]));
        block_on(dashboard.refresh());
        let first_update = dashboard.view().last_update;

        repo.push(Ok(vec![
            Asset::new("ethereum", "Ethereum", "eth").with_price(3.5).with_market_cap(350.0),
            Asset::new("solana", "Solana", "sol").with_price(150.0).with_market_cap(70.0),
        ]));
        assert_eq!(block_on(dashboard.refresh()), RefreshOutcome::Updated { cycle: 2, assets: 2 });

        let view = dashboard.view();
        let FetchState::Succeeded { at, cycle: 2 } = dashboard.fetcher().state() else {
            panic!("expected a finished second cycle");
        };
        assert_eq!(view.last_update, Some(at));
        assert_ne!(view.last_update, first_update);

        let rows: Vec<(&str, f64)> =
            view.rows.iter().map(|r| (r.asset.id.value(), r.asset.current_price.value())).collect();
        assert_eq!(rows, vec![("ethereum", 3.5), ("solana", 150.0)]);
        assert!((view.stats.total_market_cap - 420.0).abs() < 1e-9);
        assert_eq!(view.stats.btc_dominance, 0.0);
    }

    #[test]
    fn unchanged_intents_skip_save_and_render() {
        let storage = Rc::new(MemoryStorage::default());
        let (_repo, dashboard) = dashboard(storage.clone());
        let renders = Rc::new(Cell::new(0));
        let counter = renders.clone();
        dashboard.set_listener(move || counter.set(counter.get() + 1));

        assert_eq!(dashboard.dispatch(Intent::SetSort(SortMode::MarketCap)), IntentOutcome::Ignored);
        assert_eq!(dashboard.dispatch(Intent::SetTheme(Theme::Dark)), IntentOutcome::Ignored);
        assert_eq!(
            dashboard.dispatch(Intent::SetToggle { which: DisplayToggle::Volume, value: false }),
            IntentOutcome::Ignored
        );
        assert_eq!(dashboard.dispatch(Intent::ClearComparison), IntentOutcome::Ignored);
        assert_eq!(renders.get(), 0);
        assert!(storage.is_empty());

        assert_eq!(dashboard.dispatch(Intent::SetTheme(Theme::Light)), IntentOutcome::Rerender);
        assert_eq!(renders.get(), 1);
        assert_eq!(storage.get("theme").as_deref(), Some("light"));
    }

    #[test]
    fn sixth_comparison_is_rejected_without_render() {
        let (_repo, dashboard) = dashboard(Rc::new(MemoryStorage::default()));
        for id in ["a", "b", "c", "d", "e"] {
            assert_eq!(dashboard.dispatch(Intent::ToggleComparison(AssetId::from(id))), IntentOutcome::Rerender);
        }
        let renders = Rc::new(Cell::new(0));
        let counter = renders.clone();
        dashboard.set_listener(move || counter.set(counter.get() + 1));

        assert_eq!(
            dashboard.dispatch(Intent::ToggleComparison(AssetId::from("f"))),
            IntentOutcome::Rejected(SelectionError::CapacityExceeded { max: 5 })
        );
        assert_eq!(renders.get(), 0);
        assert_eq!(dashboard.view().selection_count, 5);
    }

    #[test]
    fn comparison_and_export_follow_snapshot_order() {
        let (repo, dashboard) = dashboard(Rc::new(MemoryStorage::default()));
        repo.push(Ok(assets()));
        block_on(dashboard.refresh());
        dashboard.dispatch(Intent::ToggleComparison(AssetId::from("bitcoin")));
        dashboard.dispatch(Intent::ToggleComparison(AssetId::from("ethereum")));

        let view = dashboard.view();
        let order: Vec<&str> = view.comparison.iter().map(|r| r.asset.id.value()).collect();
        assert_eq!(order, vec!["ethereum", "bitcoin"]);

        let IntentOutcome::Export(artifact) = dashboard.dispatch(Intent::ExportComparison) else {
            panic!("expected export");
        };
        assert_eq!(artifact.row_count, 2);
        assert!(artifact.content.lines().nth(1).unwrap().starts_with("Ethereum,ETH,"));
    }

    #[test]
    fn chart_for_unknown_asset_is_ignored() {
        let (repo, dashboard) = dashboard(Rc::new(MemoryStorage::default()));
        assert_eq!(dashboard.dispatch(Intent::ShowChart(AssetId::from("bitcoin"))), IntentOutcome::Ignored);
        repo.push(Ok(assets()));
        block_on(dashboard.refresh());
        assert!(matches!(
            dashboard.dispatch(Intent::ShowChart(AssetId::from("bitcoin"))),
            IntentOutcome::ShowChart(preview) if preview.title == "Bitcoin Price Chart"
        ));
    }
}
