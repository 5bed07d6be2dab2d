//! # Solana Library
//!
//! Solana integration for the swap terminal: RPC connection, explorer links,
//! native Phoenix market decoding and swap instructions, and the Phoenix
//! Data API client.

// region: --- Modules
pub mod client;
pub mod data_api;
pub mod explorer;
pub mod phoenix;
// endregion: --- Modules

// Re-export commonly used types from root for convenience
pub use client::{check_account_pubkey, validate_rpc_url, Cluster, Connection, RpcValidator};
pub use data_api::{DataApi, DataApiClient, MarketRequest, TraderRequest};
pub use explorer::Explorer;
pub use phoenix::{Market, MarketCatalog, MarketSource, RpcMarketSource, Side, Token, Trader};
