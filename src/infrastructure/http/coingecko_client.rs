use super::dto::parse_markets;
use crate::application::config::DashboardConfig;
use crate::domain::errors::{FetchError, FetchResult};
use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::market_data::{Asset, MarketDataRepository};
use gloo_net::http::Request;

/// REST client for the CoinGecko markets listing
#[derive(Debug, Clone)]
pub struct CoinGeckoRestClient {
    base_url: String,
    vs_currency: String,
    per_page: u32,
}

impl Default for CoinGeckoRestClient {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}

impl CoinGeckoRestClient {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            vs_currency: config.vs_currency.clone(),
            per_page: config.per_page,
        }
    }

    /// Top coins by market cap, first page only, no sparklines
    pub fn markets_url(&self) -> String {
        format!(
            "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page=1&sparkline=false",
            self.base_url, self.vs_currency, self.per_page
        )
    }
}

impl MarketDataRepository for CoinGeckoRestClient {
    async fn fetch_assets(&self) -> FetchResult<Vec<Asset>> {
        let url = self.markets_url();
        get_logger().info(
            LogComponent::Infrastructure("CoinGeckoAPI"),
            &format!("📈 Fetching markets from: {url}"),
        );

        let response = Request::get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.ok() {
            return Err(FetchError::Status { code: response.status(), text: response.status_text() });
        }

        let body = response.text().await.map_err(|e| FetchError::Transport(e.to_string()))?;
        let assets = parse_markets(&body)?;

        get_logger().info(
            LogComponent::Infrastructure("CoinGeckoAPI"),
            &format!("✅ Loaded {} assets", assets.len()),
        );
        Ok(assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markets_url_uses_fixed_query() {
        let client = CoinGeckoRestClient::default();
        assert_eq!(
            client.markets_url(),
            "https://api.coingecko.com/api/v3/coins/markets?vs_currency=usd&order=market_cap_desc&per_page=100&page=1&sparkline=false"
        );
    }

    #[test]
    fn base_url_override_drops_trailing_slash() {
        let config = DashboardConfig::default().with_api_base_url("http://localhost:8080/");
        let client = CoinGeckoRestClient::from_config(&config);
        assert!(client.markets_url().starts_with("http://localhost:8080/coins/markets?"));
    }
}
