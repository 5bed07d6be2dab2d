//! # Market Registry
//!
//! The Phoenix SDK publishes a JSON registry of tokens and markets per cluster:
//!
//! ```json
//! {
//!   "mainnet-beta": {
//!     "tokens":  [{ "name": "Wrapped SOL", "symbol": "wSOL", "mint": "So11…", "logoUri": "…" }],
//!     "markets": [{ "market": "4DoN…", "baseMint": "So11…", "quoteMint": "EPjF…" }]
//!   },
//!   "devnet": { … }
//! }
//! ```

use super::types::Token;
use crate::client::Cluster;
use lib_core::{AppError, Result};
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub mint: String,
    #[serde(default)]
    pub logo_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketConfigEntry {
    pub market: String,
    pub base_mint: String,
    pub quote_mint: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterConfig {
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
    #[serde(default)]
    pub markets: Vec<MarketConfigEntry>,
}

/// Parsed registry for every cluster.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketConfig(HashMap<String, ClusterConfig>);

/// Registry entries for one cluster with keys parsed.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    pub tokens: Vec<Token>,
    /// (market, base mint, quote mint)
    pub markets: Vec<(Pubkey, Pubkey, Pubkey)>,
}

impl ResolvedConfig {
    pub fn token_by_mint(&self, mint: &Pubkey) -> Option<&Token> {
        self.tokens.iter().find(|t| &t.mint == mint)
    }
}

impl MarketConfig {
    /// Download the registry.
    pub async fn fetch(http: &reqwest::Client, url: &str) -> Result<Self> {
        let response = http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Http(format!("Market config request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Http(format!(
                "Market config request returned {}",
                response.status()
            )));
        }

        let config: MarketConfig = response.json().await?;
        debug!(clusters = config.0.len(), "Market config downloaded");
        Ok(config)
    }

    /// Entries for `cluster` with addresses parsed. Malformed entries are skipped.
    pub fn for_cluster(&self, cluster: Cluster) -> Result<ResolvedConfig> {
        let raw = self
            .0
            .get(cluster.as_str())
            .ok_or_else(|| AppError::NotFound(format!("No markets configured for {}", cluster)))?;

        let tokens = raw
            .tokens
            .iter()
            .filter_map(|t| match Pubkey::from_str(&t.mint) {
                Ok(mint) => Some(Token {
                    name: t.name.clone(),
                    symbol: t.symbol.clone(),
                    mint,
                    logo_uri: t.logo_uri.clone(),
                }),
                Err(_) => {
                    warn!(symbol = %t.symbol, mint = %t.mint, "Skipping token with invalid mint");
                    None
                }
            })
            .collect();

        let markets = raw
            .markets
            .iter()
            .filter_map(|m| {
                let parsed = (
                    Pubkey::from_str(&m.market),
                    Pubkey::from_str(&m.base_mint),
                    Pubkey::from_str(&m.quote_mint),
                );
                match parsed {
                    (Ok(market), Ok(base), Ok(quote)) => Some((market, base, quote)),
                    _ => {
                        warn!(market = %m.market, "Skipping market with invalid address");
                        None
                    }
                }
            })
            .collect();

        Ok(ResolvedConfig { tokens, markets })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "mainnet-beta": {
            "tokens": [
                {"name": "Wrapped SOL", "symbol": "wSOL", "mint": "So11111111111111111111111111111111111111112", "logoUri": "https://x/sol.png"},
                {"name": "USD Coin", "symbol": "USDC", "mint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"},
                {"name": "Broken", "symbol": "BRK", "mint": "not-a-mint"}
            ],
            "markets": [
                {"market": "4DoNfFBfF7UokCC2FQzriy7yHK6DY6NVdYpuekQ5pRgg", "baseMint": "So11111111111111111111111111111111111111112", "quoteMint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"}
            ]
        },
        "devnet": {"tokens": [], "markets": []}
    }"#;

    #[test]
    fn test_parse_and_resolve_mainnet() {
        let config = serde_json::from_str::<MarketConfig>(SAMPLE).unwrap();
        let resolved = config.for_cluster(Cluster::MainnetBeta).unwrap();

        assert_eq!(resolved.tokens.len(), 2);
        assert_eq!(resolved.markets.len(), 1);
        let (_, base, _) = resolved.markets[0];
        assert_eq!(resolved.token_by_mint(&base).unwrap().symbol, "wSOL");
        assert_eq!(resolved.tokens[0].logo_uri.as_deref(), Some("https://x/sol.png"));
        assert!(resolved.tokens[1].logo_uri.is_none());
    }

    #[test]
    fn test_missing_cluster_is_not_found() {
        let config = serde_json::from_str::<MarketConfig>(r#"{"devnet": {}}"#).unwrap();
        assert!(matches!(
            config.for_cluster(Cluster::MainnetBeta),
            Err(AppError::NotFound(_))
        ));
    }
}
