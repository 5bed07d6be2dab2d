//! # Market Sources
//!
//! [`MarketSource`] is the seam between the exchange client provider and the
//! chain. [`RpcMarketSource`] loads the registry over HTTP and market accounts
//! over RPC; tests substitute an in-memory source.

use super::config::MarketConfig;
use super::market::Market;
use super::types::{Token, Trader};
use crate::client::{Cluster, Connection};
use async_trait::async_trait;
use futures::future::join_all;
use lib_core::{AppError, Result};
use solana_sdk::pubkey::Pubkey;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Everything the exchange client knows about a cluster at load time.
#[derive(Debug, Clone, Default)]
pub struct MarketCatalog {
    pub markets: Vec<Market>,
    pub tokens: Vec<Token>,
}

/// Source of market and trader state.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Load the registry and decode every listed market.
    async fn load_markets(&self, cluster: Cluster) -> Result<MarketCatalog>;

    /// Re-fetch one market's account and decode it into a new value.
    async fn refresh_market(&self, market: &Market) -> Result<Market>;

    /// Token balances of `trader` for every listed token.
    async fn load_trader(&self, trader: &Pubkey, tokens: &[Token]) -> Result<Trader>;
}

/// RPC-backed market source.
pub struct RpcMarketSource {
    connection: Connection,
    http: reqwest::Client,
    config_url: String,
}

impl RpcMarketSource {
    pub fn new(connection: Connection, config_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            connection,
            http,
            config_url: config_url.into(),
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

fn now_unix() -> u64 {
    lib_utils::now_unix_secs().max(0) as u64
}

#[async_trait]
impl MarketSource for RpcMarketSource {
    #[tracing::instrument(skip(self), fields(cluster = %cluster))]
    async fn load_markets(&self, cluster: Cluster) -> Result<MarketCatalog> {
        let start = Instant::now();
        let config = MarketConfig::fetch(&self.http, &self.config_url).await?;
        let resolved = config.for_cluster(cluster)?;

        let addresses: Vec<Pubkey> = resolved.markets.iter().map(|(m, _, _)| *m).collect();
        let accounts = self.connection.get_multiple_accounts(&addresses).await?;
        let now = now_unix();

        let mut markets = Vec::with_capacity(addresses.len());
        for ((address, base_mint, quote_mint), account) in resolved.markets.iter().zip(accounts) {
            let (Some(base), Some(quote)) = (
                resolved.token_by_mint(base_mint),
                resolved.token_by_mint(quote_mint),
            ) else {
                warn!(market = %address, "Skipping market with unlisted token");
                continue;
            };
            let Some(account) = account else {
                warn!(market = %address, "Market account not found");
                continue;
            };

            match Market::decode(*address, &account.data, base.clone(), quote.clone(), now) {
                Ok(market) => markets.push(market),
                Err(e) => warn!(market = %address, error = %e, "Failed to decode market"),
            }
        }

        if markets.is_empty() {
            return Err(AppError::NotFound(format!("No decodable markets on {}", cluster)));
        }

        info!(
            markets = markets.len(),
            tokens = resolved.tokens.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Loaded Phoenix markets"
        );

        Ok(MarketCatalog {
            markets,
            tokens: resolved.tokens,
        })
    }

    async fn refresh_market(&self, market: &Market) -> Result<Market> {
        let account = self
            .connection
            .get_account(&market.address)
            .await?
            .ok_or_else(|| AppError::Account(format!("Market {} no longer exists", market.address)))?;
        market.refreshed(&account.data, now_unix())
    }

    async fn load_trader(&self, trader: &Pubkey, tokens: &[Token]) -> Result<Trader> {
        let balances = join_all(
            tokens
                .iter()
                .map(|token| async move {
                    let balance = self.connection.token_ui_balance(trader, &token.mint).await;
                    (token.mint, balance)
                }),
        )
        .await;

        let mut result = Trader::new(*trader);
        for (mint, balance) in balances {
            result.token_balances.insert(mint, balance?);
        }
        debug!(trader = %trader, tokens = result.token_balances.len(), "Trader balances loaded");
        Ok(result)
    }
}
