//! # Phoenix Market Accounts
//!
//! Decoding of the Phoenix market account: the fixed 576-byte header, the
//! taker fee, and the bid/ask order trees, aggregated into a price ladder.
//!
//! ## Account Layout
//!
//! ```text
//! 0    .. 576   MarketHeader
//! 576  .. 832   padding
//! 832  .. 880   lot/tick params, sequence number, taker fee (856), fee counters
//! 880  .. ..    bids  red-black tree (32-byte header + bids_size * 64-byte nodes)
//! ..   .. ..    asks  red-black tree (32-byte header + asks_size * 64-byte nodes)
//! ..   .. ..    trader seats (unused here)
//! ```
//!
//! Each tree node is `[left, right, parent, color]: u32`, then the order id
//! `(price_in_ticks, sequence_number)` and the resting order
//! `(trader_index, num_base_lots, last_valid_slot, last_valid_unix_timestamp)`.
//! Node indexes are 1-based; 0 is the sentinel.

use super::types::{Side, Token};
use lib_core::{AppError, Result};
use solana_sdk::pubkey::Pubkey;
use std::collections::BTreeMap;

pub const HEADER_LEN: usize = 576;
const TAKER_FEE_BPS_OFFSET: usize = 856;
const BIDS_OFFSET: usize = 880;
const TREE_HEADER_LEN: usize = 32;
const NODE_LEN: usize = 64;

// region: --- Byte readers
fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    data.get(offset..offset + 8)
        .and_then(|b| b.try_into().ok())
        .map(u64::from_le_bytes)
        .ok_or_else(|| AppError::Decoding(format!("Market account truncated at offset {}", offset)))
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    data.get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| AppError::Decoding(format!("Market account truncated at offset {}", offset)))
}

fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey> {
    data.get(offset..offset + 32)
        .and_then(|b| <[u8; 32]>::try_from(b).ok())
        .map(Pubkey::new_from_array)
        .ok_or_else(|| AppError::Decoding(format!("Market account truncated at offset {}", offset)))
}
// endregion: --- Byte readers

/// Fixed market parameters stored at the start of every market account.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketHeader {
    pub bids_size: u64,
    pub asks_size: u64,
    pub num_seats: u64,
    pub base_decimals: u32,
    pub base_mint: Pubkey,
    pub base_vault: Pubkey,
    /// Base atoms per base lot
    pub base_lot_size: u64,
    pub quote_decimals: u32,
    pub quote_mint: Pubkey,
    pub quote_vault: Pubkey,
    /// Quote atoms per quote lot
    pub quote_lot_size: u64,
    pub tick_size_in_quote_atoms_per_base_unit: u64,
    pub authority: Pubkey,
    pub fee_recipient: Pubkey,
    pub market_sequence_number: u64,
    pub raw_base_units_per_base_unit: u32,
}

impl MarketHeader {
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(AppError::Decoding(format!(
                "Market account is {} bytes, header needs {}",
                data.len(),
                HEADER_LEN
            )));
        }

        let header = Self {
            bids_size: read_u64(data, 16)?,
            asks_size: read_u64(data, 24)?,
            num_seats: read_u64(data, 32)?,
            base_decimals: read_u32(data, 40)?,
            base_mint: read_pubkey(data, 48)?,
            base_vault: read_pubkey(data, 80)?,
            base_lot_size: read_u64(data, 112)?,
            quote_decimals: read_u32(data, 120)?,
            quote_mint: read_pubkey(data, 128)?,
            quote_vault: read_pubkey(data, 160)?,
            quote_lot_size: read_u64(data, 192)?,
            tick_size_in_quote_atoms_per_base_unit: read_u64(data, 200)?,
            authority: read_pubkey(data, 208)?,
            fee_recipient: read_pubkey(data, 240)?,
            market_sequence_number: read_u64(data, 272)?,
            raw_base_units_per_base_unit: read_u32(data, 312)?,
        };

        if header.base_lot_size == 0 || header.quote_lot_size == 0 {
            return Err(AppError::Decoding("Market header has zero lot size".to_string()));
        }
        Ok(header)
    }

    pub fn base_atoms_per_raw_unit(&self) -> f64 {
        10f64.powi(self.base_decimals as i32)
    }

    pub fn quote_atoms_per_unit(&self) -> f64 {
        10f64.powi(self.quote_decimals as i32)
    }

    fn raw_units_per_base_unit(&self) -> f64 {
        self.raw_base_units_per_base_unit.max(1) as f64
    }

    /// Price in quote units per raw base unit.
    pub fn ticks_to_price(&self, ticks: u64) -> f64 {
        ticks as f64 * self.tick_size_in_quote_atoms_per_base_unit as f64
            / self.quote_atoms_per_unit()
            / self.raw_units_per_base_unit()
    }

    /// Size in raw base units.
    pub fn base_lots_to_units(&self, lots: u64) -> f64 {
        lots as f64 * self.base_lot_size as f64 / self.base_atoms_per_raw_unit()
    }

    pub fn base_units_to_lots(&self, units: f64) -> u64 {
        (units * self.base_atoms_per_raw_unit() / self.base_lot_size as f64).floor().max(0.0) as u64
    }

    pub fn quote_units_to_lots(&self, units: f64) -> u64 {
        (units * self.quote_atoms_per_unit() / self.quote_lot_size as f64).floor().max(0.0) as u64
    }
}

/// One aggregated price level, in ticks and base lots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LadderLevel {
    pub price_in_ticks: u64,
    pub size_in_base_lots: u64,
}

/// Aggregated book: bids best (highest) first, asks best (lowest) first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ladder {
    pub bids: Vec<LadderLevel>,
    pub asks: Vec<LadderLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiLadderLevel {
    pub price: f64,
    pub quantity: f64,
}

/// Ladder in display units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiLadder {
    pub bids: Vec<UiLadderLevel>,
    pub asks: Vec<UiLadderLevel>,
}

/// Byte offset just past an order tree of `capacity` nodes starting at `tree_offset`.
fn tree_end(tree_offset: usize, capacity: u64) -> Result<usize> {
    usize::try_from(capacity)
        .ok()
        .and_then(|nodes| nodes.checked_mul(NODE_LEN))
        .and_then(|len| len.checked_add(tree_offset + TREE_HEADER_LEN))
        .ok_or_else(|| AppError::Decoding(format!("Order tree at {} has impossible size {}", tree_offset, capacity)))
}

/// Walk one order tree from its root and collect live `(price_in_ticks, base_lots)` orders.
fn collect_orders(data: &[u8], tree_offset: usize, capacity: u64, now_unix: u64) -> Result<Vec<(u64, u64)>> {
    let nodes_offset = tree_offset + TREE_HEADER_LEN;
    let tree_end = tree_end(tree_offset, capacity)?;
    if data.len() < tree_end {
        return Err(AppError::Decoding(format!(
            "Order tree at {} needs {} bytes, account has {}",
            tree_offset,
            tree_end,
            data.len()
        )));
    }

    let root = read_u32(data, tree_offset)?;
    let mut orders = Vec::new();
    let mut stack = Vec::new();
    let mut visited = 0u64;
    if root != 0 {
        stack.push(root);
    }

    while let Some(index) = stack.pop() {
        visited += 1;
        if index as u64 > capacity || visited > capacity {
            return Err(AppError::Decoding(format!("Corrupt order tree at {}", tree_offset)));
        }

        let node = nodes_offset + (index as usize - 1) * NODE_LEN;
        let left = read_u32(data, node)?;
        let right = read_u32(data, node + 4)?;
        let price_in_ticks = read_u64(data, node + 16)?;
        let num_base_lots = read_u64(data, node + 40)?;
        let last_valid_unix_timestamp = read_u64(data, node + 56)?;

        let expired = last_valid_unix_timestamp != 0 && last_valid_unix_timestamp < now_unix;
        if !expired && num_base_lots > 0 {
            orders.push((price_in_ticks, num_base_lots));
        }

        if left != 0 {
            stack.push(left);
        }
        if right != 0 {
            stack.push(right);
        }
    }

    Ok(orders)
}

fn aggregate(orders: Vec<(u64, u64)>) -> BTreeMap<u64, u64> {
    let mut levels = BTreeMap::new();
    for (price, lots) in orders {
        *levels.entry(price).or_insert(0) += lots;
    }
    levels
}

impl Ladder {
    /// Decode both sides of the book from raw market account data.
    pub fn decode(data: &[u8], header: &MarketHeader, now_unix: u64) -> Result<Self> {
        let bids = collect_orders(data, BIDS_OFFSET, header.bids_size, now_unix)?;
        let asks_offset = tree_end(BIDS_OFFSET, header.bids_size)?;
        let asks = collect_orders(data, asks_offset, header.asks_size, now_unix)?;

        let bids = aggregate(bids)
            .into_iter()
            .rev()
            .map(|(price_in_ticks, size_in_base_lots)| LadderLevel { price_in_ticks, size_in_base_lots })
            .collect();
        let asks = aggregate(asks)
            .into_iter()
            .map(|(price_in_ticks, size_in_base_lots)| LadderLevel { price_in_ticks, size_in_base_lots })
            .collect();

        Ok(Self { bids, asks })
    }

    pub fn to_ui(&self, header: &MarketHeader) -> UiLadder {
        let convert = |levels: &[LadderLevel]| {
            levels
                .iter()
                .map(|l| UiLadderLevel {
                    price: header.ticks_to_price(l.price_in_ticks),
                    quantity: header.base_lots_to_units(l.size_in_base_lots),
                })
                .collect()
        };
        UiLadder {
            bids: convert(&self.bids),
            asks: convert(&self.asks),
        }
    }
}

/// A Phoenix market with its decoded book.
#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    pub address: Pubkey,
    /// `BASE/QUOTE`
    pub name: String,
    pub base_token: Token,
    pub quote_token: Token,
    pub header: MarketHeader,
    pub taker_fee_bps: u64,
    pub ladder: Ladder,
}

impl Market {
    /// Decode a market account.
    pub fn decode(
        address: Pubkey,
        data: &[u8],
        base_token: Token,
        quote_token: Token,
        now_unix: u64,
    ) -> Result<Self> {
        let header = MarketHeader::decode(data)?;
        if header.base_mint != base_token.mint || header.quote_mint != quote_token.mint {
            return Err(AppError::Account(format!(
                "Market {} mints do not match the registry",
                address
            )));
        }

        let taker_fee_bps = read_u64(data, TAKER_FEE_BPS_OFFSET)?;
        let ladder = Ladder::decode(data, &header, now_unix)?;

        Ok(Self {
            address,
            name: format!("{}/{}", base_token.symbol, quote_token.symbol),
            base_token,
            quote_token,
            header,
            taker_fee_bps,
            ladder,
        })
    }

    /// A new market value with the book re-decoded from fresh account data.
    pub fn refreshed(&self, data: &[u8], now_unix: u64) -> Result<Self> {
        Market::decode(
            self.address,
            data,
            self.base_token.clone(),
            self.quote_token.clone(),
            now_unix,
        )
    }

    pub fn taker_fee(&self) -> f64 {
        self.taker_fee_bps as f64 / 10_000.0
    }

    pub fn ui_ladder(&self) -> UiLadder {
        self.ladder.to_ui(&self.header)
    }

    pub fn best_bid(&self) -> Option<f64> {
        self.ladder.bids.first().map(|l| self.header.ticks_to_price(l.price_in_ticks))
    }

    pub fn best_ask(&self) -> Option<f64> {
        self.ladder.asks.first().map(|l| self.header.ticks_to_price(l.price_in_ticks))
    }

    pub fn contains_token(&self, symbol: &str) -> bool {
        self.base_token.symbol == symbol || self.quote_token.symbol == symbol
    }

    /// Side for a swap paying with `in_mint`: paying the quote token is a bid.
    pub fn side_for_input(&self, in_mint: &Pubkey) -> Side {
        if *in_mint == self.quote_token.mint {
            Side::Bid
        } else {
            Side::Ask
        }
    }

    /// Expected output of an immediate swap of `in_amount`, after the taker fee.
    ///
    /// `Bid` spends quote units and returns base units; `Ask` spends base units
    /// and returns quote units. Liquidity beyond the visible book is not assumed.
    pub fn expected_out(&self, side: Side, in_amount: f64) -> f64 {
        if !(in_amount > 0.0) {
            return 0.0;
        }
        let ladder = self.ui_ladder();
        let fee = self.taker_fee();

        match side {
            Side::Bid => {
                let mut budget = in_amount / (1.0 + fee);
                let mut base_out = 0.0;
                for level in &ladder.asks {
                    if budget <= 0.0 || level.price <= 0.0 {
                        break;
                    }
                    let level_cost = level.price * level.quantity;
                    if budget >= level_cost {
                        base_out += level.quantity;
                        budget -= level_cost;
                    } else {
                        base_out += budget / level.price;
                        budget = 0.0;
                    }
                }
                base_out
            }
            Side::Ask => {
                let mut remaining = in_amount;
                let mut quote_out = 0.0;
                for level in &ladder.bids {
                    if remaining <= 0.0 {
                        break;
                    }
                    let filled = remaining.min(level.quantity);
                    quote_out += filled * level.price;
                    remaining -= filled;
                }
                quote_out * (1.0 - fee)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub const BIDS_SIZE: u64 = 4;
    pub const ASKS_SIZE: u64 = 4;

    pub fn token(symbol: &str, byte: u8) -> Token {
        Token {
            name: symbol.to_string(),
            symbol: symbol.to_string(),
            mint: Pubkey::new_from_array([byte; 32]),
            logo_uri: None,
        }
    }

    fn put_u64(buf: &mut [u8], offset: usize, value: u64) {
        buf[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
    }

    fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
        buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn write_tree(buf: &mut [u8], tree_offset: usize, orders: &[(u64, u64, u64)]) {
        if orders.is_empty() {
            return;
        }
        put_u32(buf, tree_offset, 1);
        let nodes = tree_offset + TREE_HEADER_LEN;
        for (i, (ticks, lots, expiry)) in orders.iter().enumerate() {
            let node = nodes + i * NODE_LEN;
            let right = if i + 1 < orders.len() { i as u32 + 2 } else { 0 };
            put_u32(buf, node + 4, right);
            put_u32(buf, node + 8, i as u32);
            put_u64(buf, node + 16, *ticks);
            put_u64(buf, node + 24, i as u64);
            put_u64(buf, node + 40, *lots);
            put_u64(buf, node + 56, *expiry);
        }
    }

    /// SOL/USDC-like market: 9/6 decimals, 0.001 base per lot, 0.001 quote per tick.
    /// Orders are `(price_in_ticks, base_lots, last_valid_unix_timestamp)`.
    pub fn market_account(
        base: &Token,
        quote: &Token,
        taker_fee_bps: u64,
        bids: &[(u64, u64, u64)],
        asks: &[(u64, u64, u64)],
    ) -> Vec<u8> {
        let asks_offset = BIDS_OFFSET + TREE_HEADER_LEN + BIDS_SIZE as usize * NODE_LEN;
        let len = asks_offset + TREE_HEADER_LEN + ASKS_SIZE as usize * NODE_LEN;
        let mut buf = vec![0u8; len];

        put_u64(&mut buf, 16, BIDS_SIZE);
        put_u64(&mut buf, 24, ASKS_SIZE);
        put_u64(&mut buf, 32, 8);
        put_u32(&mut buf, 40, 9);
        buf[48..80].copy_from_slice(base.mint.as_ref());
        buf[80..112].copy_from_slice(&[7u8; 32]);
        put_u64(&mut buf, 112, 1_000_000);
        put_u32(&mut buf, 120, 6);
        buf[128..160].copy_from_slice(quote.mint.as_ref());
        buf[160..192].copy_from_slice(&[8u8; 32]);
        put_u64(&mut buf, 192, 1);
        put_u64(&mut buf, 200, 1_000);
        put_u32(&mut buf, 312, 1);
        put_u64(&mut buf, TAKER_FEE_BPS_OFFSET, taker_fee_bps);

        write_tree(&mut buf, BIDS_OFFSET, bids);
        write_tree(&mut buf, asks_offset, asks);
        buf
    }

    pub fn sample_market(taker_fee_bps: u64) -> Market {
        let base = token("wSOL", 1);
        let quote = token("USDC", 2);
        let data = market_account(
            &base,
            &quote,
            taker_fee_bps,
            &[(19_000, 1_000, 0), (18_000, 3_000, 0)],
            &[(21_000, 2_000, 0), (20_000, 1_000, 0)],
        );
        Market::decode(Pubkey::new_from_array([3; 32]), &data, base, quote, 1_000)
            .expect("sample market decodes")
    }
}
