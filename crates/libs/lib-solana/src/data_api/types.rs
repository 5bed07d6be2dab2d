//! # Data API Types
//!
//! Response payloads. Numeric fields arrive as decimal strings; accessors
//! parse them on demand and fall back to zero.

use serde::{Deserialize, Serialize};

fn parse_f64(value: &str) -> f64 {
    value.parse().unwrap_or(0.0)
}

/// A single fill, as returned by trade list, top trades and trade history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fill {
    pub base_atoms_filled: String,
    pub base_lots_filled: String,
    pub base_units_filled: String,
    pub fees_paid_in_quote_atoms: String,
    pub maker: String,
    pub market_id: i64,
    pub price: String,
    pub price_in_ticks: String,
    pub quote_atoms_filled: String,
    pub quote_lots_filled: String,
    pub quote_units_filled: String,
    pub sequence_number: String,
    pub taker: String,
    pub trade_direction: i64,
    pub txid: String,
    pub unix_timestamp: String,
}

impl Fill {
    pub fn price(&self) -> f64 {
        parse_f64(&self.price)
    }

    pub fn base_units(&self) -> f64 {
        parse_f64(&self.base_units_filled)
    }

    pub fn quote_units(&self) -> f64 {
        parse_f64(&self.quote_units_filled)
    }

    pub fn timestamp(&self) -> i64 {
        self.unix_timestamp.parse().unwrap_or(0)
    }

    /// `trade_direction == 1` is a taker buy.
    pub fn is_buy(&self) -> bool {
        self.trade_direction == 1
    }

    pub fn side_label(&self) -> &'static str {
        if self.is_buy() {
            "Buy"
        } else {
            "Sell"
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumePoint {
    pub time: String,
    pub volume_in_quote_units: String,
}

impl VolumePoint {
    pub fn volume(&self) -> f64 {
        parse_f64(&self.volume_in_quote_units)
    }
}

/// Book levels come back as either JSON numbers or strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumOrStr {
    Num(f64),
    Str(String),
}

impl NumOrStr {
    pub fn as_f64(&self) -> f64 {
        match self {
            NumOrStr::Num(n) => *n,
            NumOrStr::Str(s) => parse_f64(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopOfBook {
    pub bids: Vec<Vec<NumOrStr>>,
    pub asks: Vec<Vec<NumOrStr>>,
}

impl TopOfBook {
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// `(price, size)` pairs; malformed levels are dropped.
    pub fn levels(side: &[Vec<NumOrStr>]) -> Vec<(f64, f64)> {
        side.iter()
            .filter_map(|level| match level.as_slice() {
                [price, size, ..] => Some((price.as_f64(), size.as_f64())),
                _ => None,
            })
            .collect()
    }

    pub fn bid_levels(&self) -> Vec<(f64, f64)> {
        Self::levels(&self.bids)
    }

    pub fn ask_levels(&self) -> Vec<(f64, f64)> {
        Self::levels(&self.asks)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricePoint {
    pub price: String,
    pub unix_timestamp: String,
}

impl PricePoint {
    pub fn price(&self) -> f64 {
        parse_f64(&self.price)
    }

    pub fn timestamp(&self) -> i64 {
        self.unix_timestamp.parse().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopMaker {
    pub maker: String,
    pub total_volume: String,
}

impl TopMaker {
    pub fn volume(&self) -> f64 {
        parse_f64(&self.total_volume)
    }
}

/// Sort key for `get-top-trades`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortToken {
    Base,
    Quote,
}

impl SortToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortToken::Base => "base",
            SortToken::Quote => "quote",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_parses_string_numerics() {
        let json = r#"{
            "base_units_filled": "1.25", "price": "20.5", "trade_direction": 1,
            "market_id": 4, "unix_timestamp": "1700000000", "txid": "sig", "maker": "m", "taker": "t"
        }"#;
        let fill: Fill = serde_json::from_str(json).unwrap();
        assert_eq!(fill.base_units(), 1.25);
        assert_eq!(fill.price(), 20.5);
        assert_eq!(fill.timestamp(), 1_700_000_000);
        assert_eq!(fill.side_label(), "Buy");
        assert_eq!(fill.quote_units(), 0.0);
    }

    #[test]
    fn test_top_of_book_accepts_mixed_levels() {
        let json = r#"{"bids": [[20.1, "3.5"], ["19.9", 1]], "asks": [[21, 2], [5]]}"#;
        let book: TopOfBook = serde_json::from_str(json).unwrap();
        assert_eq!(book.bid_levels(), vec![(20.1, 3.5), (19.9, 1.0)]);
        assert_eq!(book.ask_levels(), vec![(21.0, 2.0)]);
        assert!(!book.is_empty());
    }

    #[test]
    fn test_top_maker_volume() {
        let maker: TopMaker =
            serde_json::from_str(r#"{"maker": "abc", "total_volume": "1000.5"}"#).unwrap();
        assert_eq!(maker.volume(), 1000.5);
    }
}
