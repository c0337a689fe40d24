use crate::domain::market_data::AssetId;
use crate::domain::preferences::{DisplayToggle, SortMode, Theme};
use std::fmt::Debug;

/// Base trait for everything flowing through the dispatcher
pub trait DomainEvent: Debug + Clone {
    fn event_type(&self) -> &'static str;
    fn timestamp(&self) -> u64 {
        use crate::domain::logging::get_time_provider;
        get_time_provider().current_timestamp()
    }
}

/// User intents emitted by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    ToggleComparison(AssetId),
    ToggleFavorite(AssetId),
    SetSort(SortMode),
    SetToggle { which: DisplayToggle, value: bool },
    SetTheme(Theme),
    ClearComparison,
    ExportComparison,
    ShowChart(AssetId),
}

impl DomainEvent for Intent {
    fn event_type(&self) -> &'static str {
        match self {
            Intent::ToggleComparison(_) => "ToggleComparison",
            Intent::ToggleFavorite(_) => "ToggleFavorite",
            Intent::SetSort(_) => "SetSort",
            Intent::SetToggle { .. } => "SetToggle",
            Intent::SetTheme(_) => "SetTheme",
            Intent::ClearComparison => "ClearComparison",
            Intent::ExportComparison => "ExportComparison",
            Intent::ShowChart(_) => "ShowChart",
        }
    }
}

impl Intent {
    /// Whether handling this intent may write the persisted state
    pub fn mutates_preferences(&self) -> bool {
        !matches!(self, Intent::ExportComparison | Intent::ShowChart(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_intents_do_not_persist() {
        assert!(!Intent::ExportComparison.mutates_preferences());
        assert!(!Intent::ShowChart(AssetId::from("bitcoin")).mutates_preferences());
        assert!(Intent::ClearComparison.mutates_preferences());
        assert_eq!(Intent::SetSort(SortMode::Name).event_type(), "SetSort");
    }
}
