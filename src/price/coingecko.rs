//! CoinGecko quote client

use std::collections::HashMap;
use std::time::Duration;

use super::{PriceError, PriceSource};

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Quote currency for all price lookups
const VS_CURRENCY: &str = "usd";

/// Client for CoinGecko's public API
#[derive(Debug, Clone)]
pub struct CoinGeckoSource {
    base_url: String,
    client: reqwest::Client,
}

impl CoinGeckoSource {
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(COINGECKO_API_URL, timeout)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

#[async_trait::async_trait]
impl PriceSource for CoinGeckoSource {
    async fn quote(&self, asset_id: &str) -> Result<Option<f64>, PriceError> {
        let url = format!("{}/simple/price", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("ids", asset_id), ("vs_currencies", VS_CURRENCY)])
            .send()
            .await
            .map_err(|e| PriceError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PriceError::Status(response.status().as_u16()));
        }

        // Response shape: {"bitcoin": {"usd": 101234.5}}; an unknown asset
        // is simply absent from the map.
        let quotes: HashMap<String, HashMap<String, f64>> = response
            .json()
            .await
            .map_err(|e| PriceError::Decode(e.to_string()))?;

        Ok(quotes
            .get(asset_id)
            .and_then(|by_currency| by_currency.get(VS_CURRENCY))
            .copied())
    }

    async fn detail(&self, asset_id: &str) -> Result<serde_json::Value, PriceError> {
        let url = format!("{}/coins/{}", self.base_url, asset_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PriceError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PriceError::Status(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| PriceError::Decode(e.to_string()))
    }
}
