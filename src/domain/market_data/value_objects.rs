use derive_more::{Constructor, Display, From, Into};
use serde::{Deserialize, Serialize};

/// Value Object - CoinGecko coin identifier (`"bitcoin"`, `"ethereum"`, ...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AssetId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for AssetId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Value Object - price in the quote currency (USD)
#[derive(Debug, Clone, Copy, PartialEq, Default, From, Into, Constructor, Serialize, Deserialize)]
pub struct Price(f64);

impl Price {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - 24h trading volume in USD
#[derive(Debug, Clone, Copy, PartialEq, Default, From, Into, Constructor, Serialize, Deserialize)]
pub struct Volume(f64);

impl Volume {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - market capitalization in USD
#[derive(Debug, Clone, Copy, PartialEq, Default, From, Into, Constructor, Serialize, Deserialize)]
pub struct MarketCap(f64);

impl MarketCap {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - signed 24h change in percent
#[derive(Debug, Clone, Copy, PartialEq, Default, From, Into, Constructor, Serialize, Deserialize)]
pub struct PercentChange(f64);

impl PercentChange {
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Zero counts as positive, matching the green/up styling.
    pub fn is_positive(&self) -> bool {
        self.0 >= 0.0
    }
}
