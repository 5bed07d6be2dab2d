//! # Swap Tasks
//!
//! Swap submission. The form is locked (`is_sending`) and a loading toast is
//! shown until the transaction lands, fails or the signature is cancelled.

use crate::app::events::AppEvent;
use crate::app::handlers::swap::{expected_out, swap_button_disabled};
use crate::app::state::{AppState, Notice};
use crate::app::Services;
use crate::debug::spawn_tracked;
use crate::services::settings::SwapSettings;
use crate::services::swap::{self, SwapRequest};
use crate::services::Modal;
use async_channel::Sender;
use lib_solana::Market;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// Toast id shared by every stage of one submission.
pub const SWAP_TOAST_ID: &str = "swap";

#[derive(Debug)]
pub(crate) enum SwapPreparation {
    /// No wallet: the button opens the wallet modal instead
    ConnectWallet,
    Blocked,
    Ready(SwapRequest),
}

/// Validate the form and build the request. Nothing is changed on the state.
pub(crate) fn prepare_swap(
    state: &AppState,
    market: Option<Arc<Market>>,
    client_ready: bool,
    settings: SwapSettings,
) -> SwapPreparation {
    if !state.is_geobanned && !state.wallet.is_connected() {
        return SwapPreparation::ConnectWallet;
    }
    let Some(market) = market else {
        return SwapPreparation::Blocked;
    };
    let expected = expected_out(&state.swap, &market);
    if swap_button_disabled(state, client_ready, expected) {
        return SwapPreparation::Blocked;
    }
    let (Some(in_token), Some(out_token)) = (state.swap.in_token.clone(), state.swap.out_token.clone()) else {
        return SwapPreparation::Blocked;
    };

    SwapPreparation::Ready(SwapRequest {
        market,
        in_token,
        out_token,
        in_amount: state.swap.in_amount_value(),
        slippage: settings.slippage,
        priority_fee: settings.priority_fee,
    })
}

/// Internal task function - use [`crate::app::App::handle_swap_execute_click`] instead.
pub(crate) fn execute_swap(state: Arc<RwLock<AppState>>, services: &Services, event_tx: Sender<AppEvent>) {
    let market = services.exchange.selected_market();
    let client_ready = services.exchange.state().is_ready();
    let settings = services.settings.swap_settings();

    let request = {
        let mut state = state.write();
        match prepare_swap(&state, market, client_ready, settings) {
            SwapPreparation::ConnectWallet => {
                state.modals.open(Modal::ConnectWallet);
                return;
            }
            SwapPreparation::Blocked => {
                debug!("Swap click ignored");
                return;
            }
            SwapPreparation::Ready(request) => {
                state.swap.is_sending = true;
                state.swap.was_error = false;
                state.swap.sent_out_amount = request.expected_out();
                state.notify(Notice::loading("Preparing transaction...").with_id(SWAP_TOAST_ID));
                request
            }
        }
    };

    info!(
        market = %request.market.name,
        side = ?request.side(),
        in_amount = request.in_amount,
        slippage = request.slippage,
        "Submitting swap"
    );

    let handle = services.connection.current();
    let wallet = services.wallet.clone();
    spawn_tracked("swap_execution", async move {
        let outcome = swap::execute_swap(&handle.connection, wallet.as_ref(), &request)
            .await
            .map_err(|e| e.user_message());
        let _ = event_tx
            .send(AppEvent::SwapFinished {
                in_symbol: request.in_token.symbol.clone(),
                out_symbol: request.out_token.symbol.clone(),
                cluster: handle.cluster,
                outcome,
            })
            .await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use crate::services::WalletStatus;
    use solana_sdk::pubkey::Pubkey;

    fn ready_state() -> (AppState, Arc<Market>) {
        let (markets, tokens) = fixtures::sample_markets();
        let market = Arc::new(markets[1].clone());
        let mut state = AppState {
            wallet: WalletStatus::Connected(Pubkey::new_unique()),
            ..AppState::default()
        };
        state.swap.sync_market(&market, &tokens);
        state.swap.in_amount = "1".to_string();
        (state, market)
    }

    #[test]
    fn test_prepare_without_wallet_opens_modal() {
        let (mut state, market) = ready_state();
        state.wallet = WalletStatus::Disconnected;
        assert!(matches!(
            prepare_swap(&state, Some(market), true, SwapSettings::default()),
            SwapPreparation::ConnectWallet
        ));
    }

    #[test]
    fn test_prepare_builds_request_from_settings() {
        let (state, market) = ready_state();
        let settings = SwapSettings {
            slippage: 0.01,
            priority_fee: 0.0001,
        };
        match prepare_swap(&state, Some(market), true, settings) {
            SwapPreparation::Ready(request) => {
                assert_eq!(request.in_token.symbol, "wSOL");
                assert_eq!(request.in_amount, 1.0);
                assert_eq!(request.slippage, 0.01);
                assert_eq!(request.priority_fee, 0.0001);
                assert!((request.expected_out() - 19.0).abs() < 1e-9);
            }
            other => panic!("expected a request, got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_blocked_while_loading_or_banned() {
        let (mut state, market) = ready_state();
        assert!(matches!(
            prepare_swap(&state, Some(market.clone()), false, SwapSettings::default()),
            SwapPreparation::Blocked
        ));
        assert!(matches!(
            prepare_swap(&state, None, true, SwapSettings::default()),
            SwapPreparation::Blocked
        ));

        state.is_geobanned = true;
        state.wallet = WalletStatus::Disconnected;
        assert!(matches!(
            prepare_swap(&state, Some(market), true, SwapSettings::default()),
            SwapPreparation::Blocked
        ));
    }
}
