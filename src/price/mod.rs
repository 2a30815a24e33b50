//! Price source boundary
//!
//! The sweep and the asset-detail endpoint talk to the quote provider
//! through [`PriceSource`], so tests can script quotes and failures without
//! a live upstream.

pub mod coingecko;

pub use coingecko::CoinGeckoSource;

/// Price source errors
#[derive(Debug, thiserror::Error)]
pub enum PriceError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("bad response body: {0}")]
    Decode(String),
}

/// Quote provider for asset prices.
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    /// Current quoted value for an asset.
    ///
    /// `Ok(None)` means the source answered but has no quote for this asset;
    /// the watch is simply retried on the next tick.
    async fn quote(&self, asset_id: &str) -> Result<Option<f64>, PriceError>;

    /// Raw detail payload for an asset, proxied as-is by the lookup endpoint.
    async fn detail(&self, asset_id: &str) -> Result<serde_json::Value, PriceError>;
}
