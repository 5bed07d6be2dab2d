//! Query-string builders. Timestamps are taken in milliseconds and sent in seconds.

use lib_utils::{now_unix_secs, to_unix_secs};

/// `?market=<addr>[&start_timestamp=..&end_timestamp=..]<extra>`
///
/// The window is only sent when a start is set; a missing end means now.
pub fn market_query(market: &str, start_ms: Option<i64>, end_ms: Option<i64>, extra: &str) -> String {
    let window = match start_ms {
        Some(start) => format!(
            "&start_timestamp={}&end_timestamp={}",
            to_unix_secs(start),
            end_ms.map(to_unix_secs).unwrap_or_else(now_unix_secs)
        ),
        None => String::new(),
    };
    format!("?market={}{}{}", market, window, extra)
}

/// `?trader=<t>&market=<m>[window]<extra>`
///
/// Both bounds produce a full window; a single bound is sent as `&timestamp=`.
pub fn trader_query(
    trader: &str,
    market: &str,
    start_ms: Option<i64>,
    end_ms: Option<i64>,
    extra: &str,
) -> String {
    let window = match (start_ms, end_ms) {
        (Some(start), Some(end)) => format!(
            "&start_timestamp={}&end_timestamp={}",
            to_unix_secs(start),
            to_unix_secs(end)
        ),
        (Some(single), None) | (None, Some(single)) => {
            format!("&timestamp={}", to_unix_secs(single))
        }
        (None, None) => String::new(),
    };
    format!("?trader={}&market={}{}{}", trader, market, window, extra)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_query_without_window() {
        assert_eq!(market_query("M", None, Some(5_000), ""), "?market=M");
        assert_eq!(
            market_query("M", None, None, "&time_aggregation=h"),
            "?market=M&time_aggregation=h"
        );
    }

    #[test]
    fn test_market_query_floors_to_seconds() {
        assert_eq!(
            market_query("M", Some(1_700_000_000_999), Some(1_700_000_100_500), "&sort_token=base"),
            "?market=M&start_timestamp=1700000000&end_timestamp=1700000100&sort_token=base"
        );
    }

    #[test]
    fn test_market_query_open_end_uses_now() {
        let before = now_unix_secs();
        let query = market_query("M", Some(1_000), None, "");
        let end: i64 = query.rsplit('=').next().unwrap().parse().unwrap();
        assert!(query.starts_with("?market=M&start_timestamp=1&end_timestamp="));
        assert!(end >= before);
    }

    #[test]
    fn test_trader_query_windows() {
        assert_eq!(trader_query("T", "M", None, None, ""), "?trader=T&market=M");
        assert_eq!(
            trader_query("T", "M", Some(2_000), Some(9_000), ""),
            "?trader=T&market=M&start_timestamp=2&end_timestamp=9"
        );
        assert_eq!(
            trader_query("T", "M", None, Some(9_500), "&time_aggregation=h"),
            "?trader=T&market=M&timestamp=9&time_aggregation=h"
        );
    }
}
