use crate::domain::market_data::{Asset, AssetSnapshot, MarketStats, MarketStatsService};
use crate::domain::preferences::{DisplayPreferences, DisplayToggle, SortMode, Theme};
use crate::domain::selection::{FavoriteSet, SelectionSet};
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// One asset as the list renders it
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    pub asset: Asset,
    pub is_selected: bool,
    pub is_favorite: bool,
    pub is_positive_change: bool,
}

impl ViewRow {
    fn project(asset: &Asset, selection: &SelectionSet, favorites: &FavoriteSet) -> Self {
        Self {
            asset: asset.clone(),
            is_selected: selection.contains(&asset.id),
            is_favorite: favorites.contains(&asset.id),
            is_positive_change: asset.price_change_24h.is_positive(),
        }
    }
}

/// Sort mode and display switches.
///
/// Setters report whether anything changed; unchanged intents are neither
/// saved nor re-rendered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    prefs: DisplayPreferences,
}

impl ViewState {
    pub fn new(prefs: DisplayPreferences) -> Self {
        Self { prefs }
    }

    pub fn preferences(&self) -> DisplayPreferences {
        self.prefs
    }

    pub fn set_sort_by(&mut self, mode: SortMode) -> bool {
        let changed = self.prefs.sort_by != mode;
        self.prefs.sort_by = mode;
        changed
    }

    pub fn set_toggle(&mut self, which: DisplayToggle, value: bool) -> bool {
        let changed = self.prefs.toggle(which) != value;
        self.prefs.set_toggle(which, value);
        changed
    }

    pub fn set_theme(&mut self, theme: Theme) -> bool {
        let changed = self.prefs.theme != theme;
        self.prefs.theme = theme;
        changed
    }

    /// Projects the snapshot into display order.
    ///
    /// Stable: equal keys keep their fetched order.
    pub fn compute_view(
        &self,
        snapshot: &AssetSnapshot,
        selection: &SelectionSet,
        favorites: &FavoriteSet,
    ) -> Vec<ViewRow> {
        let mut assets: Vec<&Asset> = snapshot.assets().iter().collect();
        match self.prefs.sort_by {
            SortMode::MarketCap => assets.sort_by(|a, b| desc(a.market_cap.value(), b.market_cap.value())),
            SortMode::Price => assets.sort_by(|a, b| desc(a.current_price.value(), b.current_price.value())),
            SortMode::Name => assets.sort_by(|a, b| compare_names(&a.name, &b.name)),
            SortMode::Unsorted => {}
        }
        assets.into_iter().map(|asset| ViewRow::project(asset, selection, favorites)).collect()
    }

    pub fn compute_market_stats(&self, snapshot: &AssetSnapshot) -> MarketStats {
        MarketStatsService::compute(snapshot)
    }
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Base letters only: decomposed, accents stripped, lowercased.
fn base_letters(name: &str) -> String {
    name.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase).collect()
}

/// Locale-style name order: base letters, then accents, then case.
///
/// `"Ébène"` sorts with the E's, and `"Eclair"` before `"Éclair"`.
fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| a.nfd().flat_map(char::to_lowercase).cmp(b.nfd().flat_map(char::to_lowercase)))
        .then_with(|| a.cmp(b))
}
