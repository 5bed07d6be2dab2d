//! # Swap Handlers
//!
//! Token selection, flipping, max amount and the quick swap command.

use crate::app::state::{AppState, SwapForm, TokenSlot};
use crate::services::swap::{market_for_pair, market_for_token, parse_quick_swap, side_for};
use crate::services::{ExchangeClientProvider, Modal};
use lib_solana::{Market, Token};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// Expected output for the form against `market`, 0 when the form's input
/// token is not traded there.
pub(crate) fn expected_out(form: &SwapForm, market: &Market) -> f64 {
    match &form.in_token {
        Some(token) if market.contains_token(&token.symbol) => {
            market.expected_out(side_for(market, token), form.in_amount_value())
        }
        _ => 0.0,
    }
}

/// Whether the swap button is inert. Without a wallet the button stays
/// enabled so it can open the wallet modal.
pub(crate) fn swap_button_disabled(state: &AppState, client_ready: bool, expected_out: f64) -> bool {
    if state.is_geobanned {
        return true;
    }
    if !state.wallet.is_connected() {
        return false;
    }
    let form = &state.swap;
    !client_ready
        || form.is_sending
        || form.in_token.is_none()
        || form.out_token.is_none()
        || form.in_amount_value() <= 0.0
        || expected_out <= 0.0
}

/// Put `token` in the slot being picked and choose the market to trade on:
/// the market pairing it with the other slot's token if one exists, else the
/// first market listing it. The other slot is set to that market's
/// counterpart. Returns the chosen market.
pub(crate) fn choose_token(form: &mut SwapForm, token: Token, markets: &[Arc<Market>]) -> Option<Arc<Market>> {
    let market = form
        .counterpart_token()
        .filter(|other| other.mint != token.mint)
        .and_then(|other| market_for_pair(markets, &token, other))
        .or_else(|| market_for_token(markets, &token));

    let Some(market) = market else {
        form.select_token(token);
        return None;
    };

    let counterpart = if market.base_token.mint == token.mint {
        market.quote_token.clone()
    } else {
        market.base_token.clone()
    };
    form.select_token(token);
    match form.selecting {
        TokenSlot::In => form.out_token = Some(counterpart),
        TokenSlot::Out => form.in_token = Some(counterpart),
    }
    form.synced_market = Some(market.address);
    Some(market)
}

/// Internal handler function - use [`crate::app::App::open_token_select`] instead.
pub(crate) fn open_token_select(state: Arc<RwLock<AppState>>, slot: TokenSlot) {
    let mut state = state.write();
    state.swap.selecting = slot;
    state.token_search.clear();
    state.modals.open(Modal::TokenSelect);
}

/// Internal handler function - use [`crate::app::App::handle_token_select`] instead.
pub(crate) fn handle_token_select(state: Arc<RwLock<AppState>>, exchange: &ExchangeClientProvider, token: Token) {
    let snapshot = exchange.snapshot();
    let chosen = {
        let mut state = state.write();
        state.modals.close(Modal::TokenSelect);
        choose_token(&mut state.swap, token, &snapshot.markets)
    };

    if let Some(market) = chosen {
        let current = exchange.selected_market().map(|m| m.address);
        if current != Some(market.address) {
            info!(market = %market.name, "Token selection switched market");
            exchange.change_market(&market.address);
        }
    }
}

/// Internal handler function - use [`crate::app::App::handle_flip`] instead.
pub(crate) fn handle_flip(state: Arc<RwLock<AppState>>, exchange: &ExchangeClientProvider) {
    let Some(market) = exchange.selected_market() else {
        return;
    };
    let mut state = state.write();
    let out = expected_out(&state.swap, &market);
    state.swap.flip(out);
}

/// Fill the input with the trader's balance of the input token.
pub(crate) fn handle_max_amount(state: Arc<RwLock<AppState>>, exchange: &ExchangeClientProvider) {
    let snapshot = exchange.snapshot();
    let mut state = state.write();
    let balance = match (&snapshot.trader, &state.swap.in_token) {
        (Some(trader), Some(token)) => trader.balance(&token.mint),
        _ => return,
    };
    state.swap.in_amount = balance.to_string();
}

/// Internal handler function - use [`crate::app::App::handle_quick_swap_submit`] instead.
pub(crate) fn handle_quick_swap_submit(state: Arc<RwLock<AppState>>, exchange: &ExchangeClientProvider) {
    let snapshot = exchange.snapshot();
    let command = state.read().swap.quick_command.clone();

    match parse_quick_swap(&command, &snapshot.markets, &snapshot.tokens) {
        Ok(quick) => {
            debug!(command = %command, market = %quick.market, "Quick swap parsed");
            let market = quick.market;
            state.write().swap.apply_quick_swap(quick);
            if exchange.selected_market().map(|m| m.address) != Some(market) {
                exchange.change_market(&market);
            }
        }
        Err(e) => {
            state.write().swap.quick_error = Some(e.user_message());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use crate::services::WalletStatus;
    use solana_sdk::pubkey::Pubkey;

    fn catalog() -> (Vec<Arc<Market>>, Vec<Token>) {
        let (markets, tokens) = fixtures::sample_markets();
        (markets.into_iter().map(Arc::new).collect(), tokens)
    }

    fn symbol(token: &Option<Token>) -> &str {
        token.as_ref().map(|t| t.symbol.as_str()).unwrap_or("")
    }

    #[test]
    fn test_choose_token_prefers_pair_with_counterpart() {
        let (markets, tokens) = catalog();
        let mut form = SwapForm::default();
        form.sync_market(&markets[1], &tokens);

        // wSOL -> ?, picking USDC keeps wSOL/USDC
        form.selecting = TokenSlot::Out;
        let market = choose_token(&mut form, tokens[1].clone(), &markets).unwrap();
        assert_eq!(market.name, "wSOL/USDC");
        assert_eq!(symbol(&form.in_token), "wSOL");
        assert_eq!(symbol(&form.out_token), "USDC");
    }

    #[test]
    fn test_choose_token_switches_market() {
        let (markets, tokens) = catalog();
        let mut form = SwapForm::default();
        form.sync_market(&markets[1], &tokens);

        // BONK trades against the USDC output on its own market
        form.selecting = TokenSlot::In;
        let market = choose_token(&mut form, tokens[2].clone(), &markets).unwrap();
        assert_eq!(market.name, "BONK/USDC");
        assert_eq!(symbol(&form.in_token), "BONK");
        assert_eq!(symbol(&form.out_token), "USDC");
        assert_eq!(form.synced_market, Some(market.address));

        // No JUP/USDC market: first listing wins and USDC is replaced
        let market = choose_token(&mut form, tokens[3].clone(), &markets).unwrap();
        assert_eq!(market.name, "JUP/wSOL");
        assert_eq!(symbol(&form.in_token), "JUP");
        assert_eq!(symbol(&form.out_token), "wSOL");
    }

    #[test]
    fn test_choose_unlisted_token_keeps_market() {
        let (markets, _) = catalog();
        let mut form = SwapForm::default();
        let doge = fixtures::token("DOGE", 9);
        assert!(choose_token(&mut form, doge, &markets).is_none());
        assert_eq!(symbol(&form.in_token), "DOGE");
    }

    #[test]
    fn test_open_token_select_sets_slot() {
        let state = Arc::new(RwLock::new(AppState {
            token_search: "bo".to_string(),
            ..AppState::default()
        }));
        open_token_select(state.clone(), TokenSlot::Out);
        let state = state.read();
        assert_eq!(state.swap.selecting, TokenSlot::Out);
        assert!(state.token_search.is_empty());
        assert_eq!(state.modals.top(), Some(Modal::TokenSelect));
    }

    #[test]
    fn test_expected_out_requires_listed_input() {
        let (markets, tokens) = catalog();
        let mut form = SwapForm {
            in_amount: "20".to_string(),
            in_token: Some(tokens[1].clone()),
            ..SwapForm::default()
        };
        assert!((expected_out(&form, &markets[1]) - 1.0).abs() < 1e-9);
        form.in_token = Some(tokens[3].clone());
        assert_eq!(expected_out(&form, &markets[1]), 0.0);
    }

    #[test]
    fn test_swap_button_rules() {
        let (_, tokens) = catalog();
        let mut state = AppState::default();

        // No wallet: enabled so it can open the wallet modal
        assert!(!swap_button_disabled(&state, false, 0.0));

        state.wallet = WalletStatus::Connected(Pubkey::new_unique());
        assert!(swap_button_disabled(&state, true, 1.0));

        state.swap.in_token = Some(tokens[0].clone());
        state.swap.out_token = Some(tokens[1].clone());
        state.swap.in_amount = "1".to_string();
        assert!(!swap_button_disabled(&state, true, 19.0));
        assert!(swap_button_disabled(&state, true, 0.0));
        assert!(swap_button_disabled(&state, false, 19.0));

        state.swap.is_sending = true;
        assert!(swap_button_disabled(&state, true, 19.0));

        state.swap.is_sending = false;
        state.is_geobanned = true;
        assert!(swap_button_disabled(&state, true, 19.0));
    }
}
