//! CoinGecko market-data client

use crate::domain::entities::market::MarketEntry;
use crate::domain::errors::ApiError;
use crate::domain::repositories::remote_api::{ApiResult, MarketDataSource};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub struct CoinGeckoClient {
    client: Client,
    base_url: Url,
    vs_currency: String,
    per_page: u32,
}

impl CoinGeckoClient {
    pub fn new(
        base_url: &str,
        vs_currency: &str,
        per_page: u32,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ApiError::Transport(format!("Invalid market data URL {}: {}", base_url, e))
        })?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("coinfolio/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            vs_currency: vs_currency.to_string(),
            per_page,
        })
    }

    /// `GET /coins/markets` for the first page, ordered by market cap
    fn markets_url(&self) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::Transport(format!("Market data URL cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(&["coins", "markets"]);
        url.query_pairs_mut()
            .append_pair("vs_currency", &self.vs_currency)
            .append_pair("order", "market_cap_desc")
            .append_pair("per_page", &self.per_page.to_string())
            .append_pair("page", "1")
            .append_pair("sparkline", "false");
        Ok(url)
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    fn name(&self) -> &str {
        "coingecko"
    }

    async fn fetch_snapshot(&self) -> ApiResult<Vec<MarketEntry>> {
        let url = self.markets_url()?;
        debug!("Fetching market snapshot: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail: if body.is_empty() {
                    "Failed to fetch data".to_string()
                } else {
                    format!("Failed to fetch data: {}", body)
                },
            });
        }

        Ok(response.json::<Vec<MarketEntry>>().await?)
    }
}
