//! # Phoenix Data API Client
//!
//! Read-only analytics over `https://api.{network}.phoenix-v1.com`. Every
//! request carries the `X-API-Key` header.

// region: --- Modules
pub mod query;
pub mod types;
// endregion: --- Modules

use crate::client::Cluster;
use async_trait::async_trait;
use lib_core::{AppError, Result};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::debug;
use types::{Fill, PricePoint, SortToken, TopMaker, TopOfBook, VolumePoint};

pub use query::{market_query, trader_query};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Base URL for `cluster`. Anything that is not devnet resolves to mainnet.
pub fn base_api_url(cluster: Cluster) -> String {
    format!("https://api.{}.phoenix-v1.com", cluster.api_network())
}

// region: --- Requests

/// Market-scoped request window. Timestamps are unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketRequest {
    pub cluster: Cluster,
    pub market: String,
    pub start_ms: Option<i64>,
    pub end_ms: Option<i64>,
}

impl MarketRequest {
    fn query(&self, extra: &str) -> String {
        market_query(&self.market, self.start_ms, self.end_ms, extra)
    }
}

/// Trader-scoped request window. Timestamps are unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraderRequest {
    pub cluster: Cluster,
    pub trader: String,
    pub market: String,
    pub start_ms: Option<i64>,
    pub end_ms: Option<i64>,
}

impl TraderRequest {
    fn query(&self, extra: &str) -> String {
        trader_query(&self.trader, &self.market, self.start_ms, self.end_ms, extra)
    }
}

// endregion: --- Requests

// region: --- Trait

/// Analytics endpoints used by the data screen.
#[async_trait]
pub trait DataApi: Send + Sync {
    async fn market_volume(&self, req: &MarketRequest) -> Result<Vec<VolumePoint>>;
    async fn top_of_book(&self, req: &MarketRequest) -> Result<TopOfBook>;
    async fn trade_list(&self, req: &MarketRequest) -> Result<Vec<Fill>>;
    async fn top_trades(&self, req: &MarketRequest, sort: SortToken) -> Result<Vec<Fill>>;
    async fn top_makers(&self, req: &MarketRequest) -> Result<Vec<TopMaker>>;
    async fn historical_prices(&self, req: &MarketRequest) -> Result<Vec<PricePoint>>;

    async fn trader_volume(&self, req: &TraderRequest) -> Result<Vec<VolumePoint>>;
    async fn trade_history(&self, req: &TraderRequest) -> Result<Vec<Fill>>;
    /// Shape varies by deployment, so it is kept untyped.
    async fn fees_paid(&self, req: &TraderRequest) -> Result<serde_json::Value>;
}

// endregion: --- Trait

// region: --- Builder

/// Builder for [`DataApiClient`].
#[derive(Debug, Clone, Default)]
pub struct DataApiClientBuilder {
    api_key: Option<String>,
    timeout: Option<Duration>,
    base_url: Option<String>,
}

impl DataApiClientBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Pin every request to one host regardless of cluster.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn build(self) -> Result<DataApiClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::Config("Data API key is not set".to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(DataApiClient {
            http,
            api_key,
            base_url: self.base_url,
        })
    }
}

// endregion: --- Builder

// region: --- Client

/// reqwest implementation of [`DataApi`].
#[derive(Clone)]
pub struct DataApiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: Option<String>,
}

impl std::fmt::Debug for DataApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl DataApiClient {
    pub fn builder() -> DataApiClientBuilder {
        DataApiClientBuilder::default()
    }

    pub fn endpoint_url(&self, cluster: Cluster, endpoint: &str, query: &str) -> String {
        let base = self
            .base_url
            .clone()
            .unwrap_or_else(|| base_api_url(cluster));
        format!("{}/{}{}", base.trim_end_matches('/'), endpoint, query)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        cluster: Cluster,
        endpoint: &str,
        query: String,
    ) -> Result<T> {
        let url = self.endpoint_url(cluster, endpoint, &query);
        let start = Instant::now();

        let response = self
            .http
            .get(&url)
            .header("Content-Type", "application/json")
            .header("X-API-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| AppError::Http(format!("{} request failed: {}", endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Http(format!("{} returned {}", endpoint, status)));
        }

        let body = response.json::<T>().await?;
        debug!(
            endpoint,
            duration_ms = start.elapsed().as_millis() as u64,
            "Data API response"
        );
        Ok(body)
    }
}

#[async_trait]
impl DataApi for DataApiClient {
    async fn market_volume(&self, req: &MarketRequest) -> Result<Vec<VolumePoint>> {
        self.get_json(req.cluster, "get-market-volume", req.query("&time_aggregation=h"))
            .await
    }

    async fn top_of_book(&self, req: &MarketRequest) -> Result<TopOfBook> {
        self.get_json(req.cluster, "get-top-of-book", req.query("")).await
    }

    async fn trade_list(&self, req: &MarketRequest) -> Result<Vec<Fill>> {
        self.get_json(req.cluster, "get-market-trade-list", req.query(""))
            .await
    }

    async fn top_trades(&self, req: &MarketRequest, sort: SortToken) -> Result<Vec<Fill>> {
        let extra = format!("&sort_token={}", sort.as_str());
        self.get_json(req.cluster, "get-top-trades", req.query(&extra)).await
    }

    async fn top_makers(&self, req: &MarketRequest) -> Result<Vec<TopMaker>> {
        self.get_json(req.cluster, "get-top-makers", req.query("")).await
    }

    async fn historical_prices(&self, req: &MarketRequest) -> Result<Vec<PricePoint>> {
        self.get_json(req.cluster, "get-historical-prices", req.query(""))
            .await
    }

    async fn trader_volume(&self, req: &TraderRequest) -> Result<Vec<VolumePoint>> {
        self.get_json(
            req.cluster,
            "get-volume-for-trader",
            req.query("&time_aggregation=h"),
        )
        .await
    }

    async fn trade_history(&self, req: &TraderRequest) -> Result<Vec<Fill>> {
        self.get_json(req.cluster, "get-trade-history", req.query("")).await
    }

    async fn fees_paid(&self, req: &TraderRequest) -> Result<serde_json::Value> {
        self.get_json(req.cluster, "get-fees-paid-for-trader", req.query(""))
            .await
    }
}

// endregion: --- Client

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_per_cluster() {
        assert_eq!(base_api_url(Cluster::MainnetBeta), "https://api.mainnet.phoenix-v1.com");
        assert_eq!(base_api_url(Cluster::Devnet), "https://api.devnet.phoenix-v1.com");
    }

    #[test]
    fn test_builder_requires_api_key() {
        assert!(matches!(
            DataApiClient::builder().build(),
            Err(AppError::Config(_))
        ));
        assert!(DataApiClient::builder().api_key("").build().is_err());
    }

    #[test]
    fn test_endpoint_url_composition() {
        let client = DataApiClient::builder().api_key("k").build().unwrap();
        let req = MarketRequest {
            cluster: Cluster::Devnet,
            market: "M".to_string(),
            start_ms: None,
            end_ms: None,
        };
        assert_eq!(
            client.endpoint_url(req.cluster, "get-top-of-book", &req.query("")),
            "https://api.devnet.phoenix-v1.com/get-top-of-book?market=M"
        );

        let pinned = DataApiClient::builder()
            .api_key("k")
            .base_url("http://localhost:8080/")
            .build()
            .unwrap();
        assert_eq!(
            pinned.endpoint_url(Cluster::MainnetBeta, "get-top-makers", "?market=M"),
            "http://localhost:8080/get-top-makers?market=M"
        );
    }

    #[test]
    fn test_trader_request_query() {
        let req = TraderRequest {
            cluster: Cluster::MainnetBeta,
            trader: "T".to_string(),
            market: "M".to_string(),
            start_ms: Some(1_000),
            end_ms: Some(2_000),
        };
        assert_eq!(
            req.query("&time_aggregation=h"),
            "?trader=T&market=M&start_timestamp=1&end_timestamp=2&time_aggregation=h"
        );
    }
}
