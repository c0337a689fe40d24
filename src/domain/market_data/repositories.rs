use crate::domain::errors::FetchResult;
use crate::domain::market_data::Asset;

/// Source of the current market listing.
///
/// One call is one attempt; retries live in the fetcher.
#[allow(async_fn_in_trait)]
pub trait MarketDataRepository {
    async fn fetch_assets(&self) -> FetchResult<Vec<Asset>>;
}
