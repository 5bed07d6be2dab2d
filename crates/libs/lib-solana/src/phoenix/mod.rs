//! # Phoenix Exchange Client
//!
//! Native client for the Phoenix on-chain order book: market registry loading,
//! market account decoding, swap quoting, and swap instruction construction.
//!
//! ## Overview
//!
//! - [`config`] - market/token registry published alongside the Phoenix SDK
//! - [`market`] - header + order book decoding and expected-out quoting
//! - [`instructions`] - `Swap` and compute budget instructions
//! - [`source`] - the [`MarketSource`] seam and its RPC-backed implementation
//!
//! ## Example
//!
//! ```rust,no_run
//! use lib_solana::client::{Cluster, Connection};
//! use lib_solana::phoenix::{MarketSource, RpcMarketSource, Side};
//!
//! # async fn example() -> lib_core::Result<()> {
//! let connection = Connection::new("https://api.mainnet-beta.solana.com");
//! let source = RpcMarketSource::new(connection, lib_core::config::DEFAULT_MARKET_CONFIG_URL)?;
//! let catalog = source.load_markets(Cluster::MainnetBeta).await?;
//! if let Some(market) = catalog.markets.first() {
//!     println!("{}: 10 {} -> {:.4} {}",
//!         market.name,
//!         market.quote_token.symbol,
//!         market.expected_out(Side::Bid, 10.0),
//!         market.base_token.symbol);
//! }
//! # Ok(())
//! # }
//! ```

// region: --- Modules
pub mod config;
pub mod instructions;
pub mod market;
pub mod source;
pub mod types;
// endregion: --- Modules

use solana_sdk::pubkey::Pubkey;

/// Phoenix v1 program.
pub const PHOENIX_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("PhoeNiXZ8ByJGLkxNfZRnkUfjvmuYqLR89jjFHGqdXY");

/// Default slippage tolerance for swaps (0.5%).
pub const DEFAULT_SLIPPAGE: f64 = 0.005;

/// Preferred market selected when nothing else applies.
pub const PREFERRED_MARKET_NAME: &str = "wSOL/USDC";

/// PDA that Phoenix uses as the self-CPI log authority.
pub fn log_authority() -> Pubkey {
    Pubkey::find_program_address(&[b"log"], &PHOENIX_PROGRAM_ID).0
}

// Re-export commonly used types
pub use config::MarketConfig;
pub use market::{Ladder, LadderLevel, Market, MarketHeader, UiLadder, UiLadderLevel};
pub use source::{MarketCatalog, MarketSource, RpcMarketSource};
pub use types::{Side, Token, Trader};
