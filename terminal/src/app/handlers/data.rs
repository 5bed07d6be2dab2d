//! # Data Screen Handlers
//!
//! Tab, market, trader and date range selection. The resulting
//! [`crate::services::DataKey`] is pushed to the data provider on the next tick.

use crate::app::state::{AppState, TraderCheck};
use crate::services::{DataTab, ExchangeClientProvider, Modal};
use lib_utils::is_pubkey_format;
use parking_lot::RwLock;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::debug;

pub(crate) fn handle_tab_change(state: Arc<RwLock<AppState>>, tab: DataTab) {
    state.write().data.tab = tab;
}

/// Record the typed trader key. Returns the address to look up on chain when
/// it is well formed; anything else resolves immediately.
pub(crate) fn handle_trader_input(state: Arc<RwLock<AppState>>, input: String) -> Option<String> {
    let mut state = state.write();
    let address = input.trim().to_string();

    if address.is_empty() {
        state.data.clear_trader();
        state.data.trader_input = input;
        return None;
    }
    state.data.trader_input = input;
    if !is_pubkey_format(&address) {
        state.data.trader.clear();
        state.data.trader_check = TraderCheck::Invalid;
        return None;
    }
    state.data.trader_check = TraderCheck::Checking;
    Some(address)
}

/// Internal handler function - use [`crate::app::App::handle_show_trader`] instead.
pub(crate) fn handle_show_trader(state: Arc<RwLock<AppState>>, address: &str) {
    debug!(trader = %address, "Showing trader");
    state.write().data.show_trader(address);
}

pub(crate) fn handle_market_select(state: Arc<RwLock<AppState>>, exchange: &ExchangeClientProvider, address: &Pubkey) {
    exchange.change_market(address);
    state.write().modals.close(Modal::MarketSelect);
}

/// `None` clears the bound.
pub(crate) fn handle_start_days(state: Arc<RwLock<AppState>>, days_back: Option<u32>) {
    let now_ms = chrono::Utc::now().timestamp_millis();
    state.write().data.set_start_days_back(now_ms, days_back);
}

pub(crate) fn handle_end_days(state: Arc<RwLock<AppState>>, days_back: Option<u32>) {
    let now_ms = chrono::Utc::now().timestamp_millis();
    state.write().data.set_end_days_back(now_ms, days_back);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trader_input_classification() {
        let state = Arc::new(RwLock::new(AppState::default()));

        assert!(handle_trader_input(state.clone(), "  ".to_string()).is_none());
        assert_eq!(state.read().data.trader_check, TraderCheck::Empty);

        assert!(handle_trader_input(state.clone(), "not a key".to_string()).is_none());
        assert_eq!(state.read().data.trader_check, TraderCheck::Invalid);

        let key = Pubkey::new_unique().to_string();
        let lookup = handle_trader_input(state.clone(), format!(" {} ", key));
        assert_eq!(lookup.as_deref(), Some(key.as_str()));
        assert_eq!(state.read().data.trader_check, TraderCheck::Checking);

        // The lookup result is matched against the trimmed input
        state.write().data.resolve_trader_check(&key, true);
        assert_eq!(state.read().data.trader, key);
    }

    #[test]
    fn test_date_bounds_can_be_cleared() {
        let state = Arc::new(RwLock::new(AppState::default()));
        handle_start_days(state.clone(), Some(7));
        handle_end_days(state.clone(), Some(0));
        {
            let s = state.read();
            let (start, end) = (s.data.start_ms.unwrap(), s.data.end_ms.unwrap());
            assert!(start < end);
        }
        handle_start_days(state.clone(), None);
        assert!(state.read().data.start_ms.is_none());
    }
}
