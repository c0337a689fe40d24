pub mod config;
pub mod dashboard;
pub mod fetcher;
pub mod preference_store;
pub mod scheduler;

pub use config::{DashboardConfig, RetryPolicy};
pub use dashboard::{Dashboard, DashboardView, IntentOutcome, RefreshOutcome};
pub use fetcher::{FetchCycle, FetchState, MarketDataFetcher};
pub use preference_store::{KeyValueStorage, PreferenceStore};
pub use scheduler::RefreshScheduler;
