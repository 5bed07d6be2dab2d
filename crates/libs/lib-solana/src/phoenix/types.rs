//! # Phoenix Types
//!
//! Tokens, traders, and order sides shared by the market model and the swap flow.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;

/// Order side. `Bid` spends the quote token, `Ask` spends the base token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    /// Wire discriminant in Phoenix order packets.
    pub fn discriminant(&self) -> u8 {
        match self {
            Side::Bid => 0,
            Side::Ask => 1,
        }
    }
}

/// A token listed in the market registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub name: String,
    pub symbol: String,
    pub mint: Pubkey,
    pub logo_uri: Option<String>,
}

/// A wallet identity with token balances tracked against the listed markets.
#[derive(Debug, Clone, PartialEq)]
pub struct Trader {
    pub pubkey: Pubkey,
    /// Mint -> UI amount
    pub token_balances: HashMap<Pubkey, f64>,
}

impl Trader {
    pub fn new(pubkey: Pubkey) -> Self {
        Self {
            pubkey,
            token_balances: HashMap::new(),
        }
    }

    /// UI balance for `mint`, 0 when unknown.
    pub fn balance(&self, mint: &Pubkey) -> f64 {
        self.token_balances.get(mint).copied().unwrap_or(0.0)
    }
}
