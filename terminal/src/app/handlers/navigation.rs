//! # Navigation Handlers
//!
//! Screen changes and the modal stack.

use crate::app::state::{AppState, Screen};
use crate::services::Modal;
use parking_lot::RwLock;
use std::sync::Arc;

/// Internal handler function - use [`crate::app::App::handle_screen_change`] instead.
pub(crate) fn handle_screen_change(state: Arc<RwLock<AppState>>, screen: Screen) {
    let mut state = state.write();
    if state.current_screen != screen {
        tracing::debug!(from = ?state.current_screen, to = ?screen, "Screen change");
        state.current_screen = screen;
    }
}

pub(crate) fn open_modal(state: Arc<RwLock<AppState>>, modal: Modal) {
    let mut state = state.write();
    match modal {
        Modal::TokenSelect => state.token_search.clear(),
        Modal::MarketSelect => state.market_search.clear(),
        Modal::ConnectWallet => state.wallet_form.error = None,
        _ => {}
    }
    state.modals.open(modal);
}

pub(crate) fn close_modal(state: Arc<RwLock<AppState>>, modal: Modal) {
    state.write().modals.close(modal);
}

/// Leave the swap screen for the data screen and dismiss the region modal.
pub(crate) fn handle_leave_swap(state: Arc<RwLock<AppState>>) {
    let mut state = state.write();
    state.current_screen = Screen::Data;
    state.modals.close(Modal::Geobanned);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leave_swap_goes_to_data() {
        let state = Arc::new(RwLock::new(AppState {
            current_screen: Screen::Swap,
            ..AppState::default()
        }));
        open_modal(state.clone(), Modal::Geobanned);
        handle_leave_swap(state.clone());

        let state = state.read();
        assert_eq!(state.current_screen, Screen::Data);
        assert!(!state.modals.is_open(Modal::Geobanned));
    }

    #[test]
    fn test_opening_search_modal_clears_query() {
        let state = Arc::new(RwLock::new(AppState::default()));
        state.write().market_search = "sol".to_string();
        open_modal(state.clone(), Modal::MarketSelect);
        assert!(state.read().market_search.is_empty());
        assert!(state.read().modals.is_open(Modal::MarketSelect));
    }
}
