//! Browser side effects of dashboard outcomes, plus display helpers.

pub mod chart_canvas;
pub mod download;
pub mod format;

use crate::application::{Dashboard, IntentOutcome, KeyValueStorage};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::MarketDataRepository;
use crate::global_state::{chart_preview, dashboard_view, notice};
use crate::time_utils::Timer;
use crate::{log_error, log_info};
use leptos::SignalSet;

/// Pushes a fresh view into the reactive globals.
pub fn publish_view<R, T, K>(dashboard: &Dashboard<R, T, K>)
where
    R: MarketDataRepository,
    T: Timer,
    K: KeyValueStorage,
{
    dashboard_view().set(Some(dashboard.view()));
}

/// Applies the non-render side of an intent outcome.
pub fn present_outcome(outcome: IntentOutcome) {
    match outcome {
        IntentOutcome::Rerender => notice().set(None),
        IntentOutcome::Rejected(err) => notice().set(Some(err.to_string())),
        IntentOutcome::Export(artifact) => match download::download_artifact(&artifact) {
            Ok(()) => {
                log_info!(
                    LogComponent::Presentation("Export"),
                    "📤 Exported {} rows to {}",
                    artifact.row_count,
                    artifact.file_name
                );
            }
            Err(e) => {
                log_error!(LogComponent::Presentation("Export"), "❌ Download failed: {:?}", e);
            }
        },
        IntentOutcome::ShowChart(preview) => chart_preview().set(Some(preview)),
        IntentOutcome::Ignored => {}
    }
}
