use crate::domain::selection::MAX_COMPARISON;
use std::time::Duration;

pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const UPDATE_INTERVAL: Duration = Duration::from_millis(60_000);
pub const MAX_RETRIES: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_millis(5_000);
pub const PAGE_SIZE: u32 = 100;

/// Runtime knobs for the dashboard. Defaults match the public deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub vs_currency: String,
    pub per_page: u32,
    pub max_comparison: usize,
    pub refresh_interval: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: COINGECKO_API_URL.to_string(),
            vs_currency: "usd".to_string(),
            per_page: PAGE_SIZE,
            max_comparison: MAX_COMPARISON,
            refresh_interval: UPDATE_INTERVAL,
            max_retries: MAX_RETRIES,
            retry_delay: RETRY_DELAY,
        }
    }
}

impl DashboardConfig {
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_max_comparison(mut self, max: usize) -> Self {
        self.max_comparison = max;
        self
    }

    pub fn with_retry_policy(mut self, max_retries: u32, delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = delay;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy { max_retries: self.max_retries, delay: self.retry_delay }
    }
}

/// Fixed-delay retry bound: at most `max_retries + 1` attempts per cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: MAX_RETRIES, delay: RETRY_DELAY }
    }
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}
