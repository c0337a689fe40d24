use crate::domain::selection::{FavoriteSet, SelectionSet};
use serde::Serialize;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Ordering applied to the asset list
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize,
)]
pub enum SortMode {
    #[default]
    #[strum(serialize = "market_cap")]
    #[serde(rename = "market_cap")]
    MarketCap,

    #[strum(serialize = "price")]
    #[serde(rename = "price")]
    Price,

    #[strum(serialize = "name")]
    #[serde(rename = "name")]
    Name,

    /// Identity order; any unrecognised persisted value lands here.
    #[strum(serialize = "none")]
    #[serde(rename = "none")]
    Unsorted,
}

impl SortMode {
    /// Orders the sort picker offers; `Unsorted` is only a fallback.
    pub const CHOICES: [SortMode; 3] = [SortMode::MarketCap, SortMode::Price, SortMode::Name];

    /// Lenient parse: unknown strings keep the fetched order.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.trim().parse().unwrap_or(SortMode::Unsorted)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortMode::MarketCap => "Market Cap",
            SortMode::Price => "Price",
            SortMode::Name => "Name",
            SortMode::Unsorted => "Default",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize,
)]
pub enum Theme {
    #[strum(serialize = "light")]
    #[serde(rename = "light")]
    Light,

    #[default]
    #[strum(serialize = "dark")]
    #[serde(rename = "dark")]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// The three boolean display switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize)]
pub enum DisplayToggle {
    #[strum(serialize = "show24hChange")]
    Change24h,
    #[strum(serialize = "showCharts")]
    Charts,
    #[strum(serialize = "showVolume")]
    Volume,
}

impl DisplayToggle {
    /// Storage key for this toggle
    pub fn storage_key(&self) -> &str {
        self.as_ref()
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisplayToggle::Change24h => "24h Change",
            DisplayToggle::Charts => "Charts",
            DisplayToggle::Volume => "Volume",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DisplayPreferences {
    pub show_24h_change: bool,
    pub show_charts: bool,
    pub show_volume: bool,
    pub sort_by: SortMode,
    pub theme: Theme,
}

impl DisplayPreferences {
    pub fn toggle(&self, which: DisplayToggle) -> bool {
        match which {
            DisplayToggle::Change24h => self.show_24h_change,
            DisplayToggle::Charts => self.show_charts,
            DisplayToggle::Volume => self.show_volume,
        }
    }

    pub fn set_toggle(&mut self, which: DisplayToggle, value: bool) {
        match which {
            DisplayToggle::Change24h => self.show_24h_change = value,
            DisplayToggle::Charts => self.show_charts = value,
            DisplayToggle::Volume => self.show_volume = value,
        }
    }
}

/// Everything that survives a page reload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersistedState {
    pub selection: SelectionSet,
    pub favorites: FavoriteSet,
    pub preferences: DisplayPreferences,
}
