use crate::domain::market_data::{AssetSnapshot, BITCOIN_ID};
use serde::Serialize;

/// Aggregate figures shown in the header bar
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MarketStats {
    pub total_market_cap: f64,
    pub total_volume: f64,
    /// Bitcoin's share of `total_market_cap`, in percent
    pub btc_dominance: f64,
}

/// Domain service for snapshot-wide statistics
pub struct MarketStatsService;

impl MarketStatsService {
    pub fn compute(snapshot: &AssetSnapshot) -> MarketStats {
        let total_market_cap: f64 = snapshot.assets().iter().map(|a| a.market_cap.value()).sum();
        let total_volume: f64 = snapshot.assets().iter().map(|a| a.total_volume.value()).sum();

        let btc_dominance = snapshot
            .assets()
            .iter()
            .find(|a| a.id == *BITCOIN_ID)
            .filter(|_| total_market_cap > 0.0)
            .map(|btc| btc.market_cap.value() / total_market_cap * 100.0)
            .unwrap_or(0.0);

        MarketStats { total_market_cap, total_volume, btc_dominance }
    }
}
