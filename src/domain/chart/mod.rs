//! Illustrative price chart shown in the modal.
//!
//! The series is derived from the current price only; no history is fetched.

use crate::domain::market_data::{Asset, AssetId};

pub const CHART_LABELS: [&str; 6] = ["1h", "2h", "3h", "4h", "5h", "6h"];
const PRICE_FACTORS: [f64; 6] = [0.95, 0.98, 1.02, 1.05, 1.03, 1.0];

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: &'static str,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPreview {
    pub asset_id: AssetId,
    pub title: String,
    pub points: Vec<ChartPoint>,
}

impl ChartPreview {
    pub fn for_asset(asset: &Asset) -> Self {
        let price = asset.current_price.value();
        let points = CHART_LABELS
            .into_iter()
            .zip(PRICE_FACTORS)
            .map(|(label, factor)| ChartPoint { label, price: price * factor })
            .collect();
        Self { asset_id: asset.id.clone(), title: format!("{} Price Chart", asset.name), points }
    }

    /// `(min, max)` over the series; `None` when empty
    pub fn price_range(&self) -> Option<(f64, f64)> {
        let mut prices = self.points.iter().map(|p| p.price);
        let first = prices.next()?;
        Some(prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}
