use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::application::{
    Dashboard, DashboardConfig, MarketDataFetcher, PreferenceStore, RefreshOutcome, RefreshScheduler,
};
use crate::domain::logging::{LogComponent, get_logger};
use crate::infrastructure::http::CoinGeckoRestClient;
use crate::infrastructure::storage::BrowserStorage;
use crate::time_utils::GlooTimer;

pub mod app;
pub mod application;
pub mod domain;
pub mod event_utils;
pub mod global_state;
pub mod infrastructure;
pub mod macros;
pub mod presentation;
pub mod time_utils;
pub mod view_state;

/// The dashboard as wired up in the browser
pub type BrowserDashboard = Dashboard<CoinGeckoRestClient, GlooTimer, BrowserStorage>;

/// Initialize logging, restore preferences, mount the UI and start refreshing
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let console_logger = Box::new(infrastructure::services::ConsoleLogger::new_development());
    domain::logging::init_logger(console_logger);

    let browser_time_provider = Box::new(infrastructure::services::BrowserTimeProvider::new());
    domain::logging::init_time_provider(browser_time_provider);

    let config = DashboardConfig::default();
    let dashboard = Rc::new(build_dashboard(&config));
    connect_signals(&dashboard);

    #[cfg(not(feature = "logic-only"))]
    mount_app(dashboard.clone());

    start_refresh_loop(dashboard, &config);

    get_logger().info(LogComponent::Presentation("Initialize"), "🚀 Crypto dashboard initialized");
}

pub fn build_dashboard(config: &DashboardConfig) -> BrowserDashboard {
    let fetcher = MarketDataFetcher::new(CoinGeckoRestClient::from_config(config), GlooTimer, config.retry_policy());
    let store = PreferenceStore::new(BrowserStorage::open_or_memory(), config.max_comparison);
    Dashboard::new(fetcher, store)
}

fn connect_signals(dashboard: &Rc<BrowserDashboard>) {
    use leptos::SignalSet;

    let weak = Rc::downgrade(dashboard);
    dashboard.set_listener(move || {
        if let Some(dashboard) = weak.upgrade() {
            presentation::publish_view(dashboard.as_ref());
        }
    });
    dashboard.fetcher().set_observer(|state| global_state::fetch_state().set(state.clone()));
    presentation::publish_view(dashboard.as_ref());
}

#[cfg(not(feature = "logic-only"))]
fn mount_app(dashboard: Rc<BrowserDashboard>) {
    use crate::app::App;
    use crate::domain::events::Intent;
    use leptos::*;

    let on_intent = Callback::new(move |intent: Intent| presentation::present_outcome(dashboard.dispatch(intent)));
    mount_to_body(move || view! { <App on_intent=on_intent /> });
}

fn start_refresh_loop(dashboard: Rc<BrowserDashboard>, config: &DashboardConfig) {
    let scheduler = RefreshScheduler::new(config.refresh_interval);
    wasm_bindgen_futures::spawn_local(async move {
        scheduler
            .run(&GlooTimer, move |_tick| {
                let dashboard = dashboard.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    match dashboard.refresh().await {
                        RefreshOutcome::Failed(err) => get_logger().error(
                            LogComponent::Presentation("Refresh"),
                            &format!("❌ Market data unavailable: {err}"),
                        ),
                        RefreshOutcome::Updated { cycle, assets } => get_logger().debug(
                            LogComponent::Presentation("Refresh"),
                            &format!("🔄 Cycle {cycle}: {assets} assets"),
                        ),
                        RefreshOutcome::Skipped => {}
                    }
                });
            })
            .await;
    });
}
