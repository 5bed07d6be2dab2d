//! Market fixtures shared by service tests.
//!
//! Header parameters give prices of `ticks / 1000` and sizes of `lots / 1000`.

use lib_solana::phoenix::{Ladder, LadderLevel, MarketHeader};
use lib_solana::{Market, Token};
use solana_sdk::pubkey::Pubkey;

pub fn token(symbol: &str, byte: u8) -> Token {
    Token {
        name: symbol.to_string(),
        symbol: symbol.to_string(),
        mint: Pubkey::new_from_array([byte; 32]),
        logo_uri: None,
    }
}

fn header(base: &Token, quote: &Token) -> MarketHeader {
    MarketHeader {
        bids_size: 4,
        asks_size: 4,
        num_seats: 8,
        base_decimals: 9,
        base_mint: base.mint,
        base_vault: Pubkey::new_from_array([200; 32]),
        base_lot_size: 1_000_000,
        quote_decimals: 6,
        quote_mint: quote.mint,
        quote_vault: Pubkey::new_from_array([201; 32]),
        quote_lot_size: 1,
        tick_size_in_quote_atoms_per_base_unit: 1_000,
        authority: Pubkey::default(),
        fee_recipient: Pubkey::default(),
        market_sequence_number: 0,
        raw_base_units_per_base_unit: 1,
    }
}

/// A market with the given `(price_in_ticks, base_lots)` levels, best first.
pub fn market(
    address_byte: u8,
    base: &Token,
    quote: &Token,
    bids: &[(u64, u64)],
    asks: &[(u64, u64)],
) -> Market {
    let levels = |side: &[(u64, u64)]| {
        side.iter()
            .map(|&(price_in_ticks, size_in_base_lots)| LadderLevel {
                price_in_ticks,
                size_in_base_lots,
            })
            .collect()
    };

    Market {
        address: Pubkey::new_from_array([address_byte; 32]),
        name: format!("{}/{}", base.symbol, quote.symbol),
        base_token: base.clone(),
        quote_token: quote.clone(),
        header: header(base, quote),
        taker_fee_bps: 0,
        ladder: Ladder {
            bids: levels(bids),
            asks: levels(asks),
        },
    }
}

/// wSOL/USDC at 19/20, plus BONK/USDC and JUP/wSOL.
pub fn sample_markets() -> (Vec<Market>, Vec<Token>) {
    let wsol = token("wSOL", 1);
    let usdc = token("USDC", 2);
    let bonk = token("BONK", 3);
    let jup = token("JUP", 4);

    let markets = vec![
        market(10, &bonk, &usdc, &[(1, 1_000)], &[(2, 1_000)]),
        market(11, &wsol, &usdc, &[(19_000, 1_000)], &[(20_000, 1_000), (21_000, 2_000)]),
        market(12, &jup, &wsol, &[(50, 1_000)], &[(60, 1_000)]),
    ];
    (markets, vec![wsol, usdc, bonk, jup])
}
