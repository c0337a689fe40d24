pub mod coingecko_client;
pub mod dto;

pub use coingecko_client::CoinGeckoRestClient;
pub use dto::{CoinMarketDto, parse_markets};
