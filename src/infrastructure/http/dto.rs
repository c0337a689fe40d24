use crate::domain::errors::{FetchError, FetchResult};
use crate::domain::market_data::{Asset, MarketCap, PercentChange, Price, Volume};
use serde::Deserialize;

/// One row of `/coins/markets`.
///
/// Numeric fields are nullable upstream (new or delisted coins) and read as 0.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinMarketDto {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

impl From<CoinMarketDto> for Asset {
    fn from(dto: CoinMarketDto) -> Self {
        Asset {
            id: dto.id.into(),
            name: dto.name,
            symbol: dto.symbol,
            current_price: Price::new(dto.current_price.unwrap_or_default()),
            price_change_24h: PercentChange::new(dto.price_change_percentage_24h.unwrap_or_default()),
            market_cap: MarketCap::new(dto.market_cap.unwrap_or_default()),
            total_volume: Volume::new(dto.total_volume.unwrap_or_default()),
            image: dto.image.unwrap_or_default(),
        }
    }
}

/// Decodes a markets response body, keeping payload order.
pub fn parse_markets(body: &str) -> FetchResult<Vec<Asset>> {
    let rows: Vec<CoinMarketDto> =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    Ok(rows.into_iter().map(Asset::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_numbers_read_as_zero() {
        let body = r#"[
            {"id":"bitcoin","symbol":"btc","name":"Bitcoin","image":"https://img/btc.png",
             "current_price":65000.5,"market_cap":1.2e12,"total_volume":3.4e10,
             "price_change_percentage_24h":-1.25,"ath":69000},
            {"id":"newcoin","symbol":"new","name":"New Coin","image":null,
             "current_price":null,"market_cap":null,"total_volume":null,
             "price_change_percentage_24h":null}
        ]"#;
        let assets = parse_markets(body).unwrap();
        assert_eq!(assets.len(), 2);

        let btc = &assets[0];
        assert_eq!(btc.id.value(), "bitcoin");
        assert_eq!(btc.current_price.value(), 65000.5);
        assert_eq!(btc.price_change_24h.value(), -1.25);
        assert_eq!(btc.image, "https://img/btc.png");

        let new = &assets[1];
        assert_eq!(new.market_cap.value(), 0.0);
        assert_eq!(new.price_change_24h.value(), 0.0);
        assert!(new.image.is_empty());
    }

    #[test]
    fn non_array_body_is_decode_error() {
        let err = parse_markets(r#"{"status":{"error_code":429}}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert!(err.is_retryable());
    }
}
