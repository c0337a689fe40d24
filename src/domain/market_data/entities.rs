pub use super::value_objects::{AssetId, MarketCap, PercentChange, Price, Volume};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifier whose market cap drives the dominance figure
pub const BITCOIN_ID: &str = "bitcoin";

/// Domain entity - one coin's market data for a single fetch cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    pub symbol: String,
    pub current_price: Price,
    pub price_change_24h: PercentChange,
    pub market_cap: MarketCap,
    pub total_volume: Volume,
    pub image: String,
}

impl Asset {
    pub fn new(id: impl Into<AssetId>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            current_price: Price::default(),
            price_change_24h: PercentChange::default(),
            market_cap: MarketCap::default(),
            total_volume: Volume::default(),
            image: String::new(),
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.current_price = Price::new(price);
        self
    }

    pub fn with_change(mut self, change: f64) -> Self {
        self.price_change_24h = PercentChange::new(change);
        self
    }

    pub fn with_market_cap(mut self, market_cap: f64) -> Self {
        self.market_cap = MarketCap::new(market_cap);
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.total_volume = Volume::new(volume);
        self
    }

    pub fn display_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }
}

/// Domain entity - the complete result of one fetch cycle.
///
/// Built in one step from a payload and never patched afterwards; a refresh
/// replaces the whole value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssetSnapshot {
    assets: Vec<Asset>,
    cycle: u64,
    fetched_at: Option<u64>,
}

impl AssetSnapshot {
    /// Keeps payload order; a repeated id keeps its first occurrence.
    pub fn new(assets: Vec<Asset>, cycle: u64, fetched_at: u64) -> Self {
        let mut seen = HashSet::with_capacity(assets.len());
        let assets = assets.into_iter().filter(|asset| seen.insert(asset.id.clone())).collect();
        Self { assets, cycle, fetched_at: Some(fetched_at) }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn get(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.iter().find(|asset| &asset.id == id)
    }

    pub fn contains(&self, id: &AssetId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Fetch cycle that produced this snapshot (0 = never fetched)
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Millisecond timestamp of the successful fetch
    pub fn fetched_at(&self) -> Option<u64> {
        self.fetched_at
    }
}
