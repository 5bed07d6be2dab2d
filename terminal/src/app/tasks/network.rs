//! # Network Tasks
//!
//! Custom RPC endpoint validation and trader account lookups.

use crate::app::events::AppEvent;
use crate::app::state::AppState;
use crate::debug::spawn_tracked;
use crate::services::connection::ConnectionHandle;
use crate::services::ConnectionProvider;
use async_channel::Sender;
use lib_solana::check_account_pubkey;
use parking_lot::RwLock;
use std::sync::Arc;

/// Validate the typed custom endpoint and switch to it if it answers.
pub(crate) fn submit_custom_rpc(
    state: Arc<RwLock<AppState>>,
    connection: Arc<ConnectionProvider>,
    event_tx: Sender<AppEvent>,
) {
    let input = {
        let mut state = state.write();
        if state.settings_form.validating_rpc || state.settings_form.custom_rpc.trim().is_empty() {
            return;
        }
        state.settings_form.validating_rpc = true;
        state.settings_form.custom_rpc.trim().to_string()
    };

    spawn_tracked("custom_rpc_validation", async move {
        let outcome = connection.submit_custom_endpoint(&input).await;
        let _ = event_tx.send(AppEvent::CustomRpcResult(outcome)).await;
    });
}

/// Check that `address` is an existing account on the live cluster.
pub(crate) fn check_trader(connection: Arc<ConnectionHandle>, address: String, event_tx: Sender<AppEvent>) {
    spawn_tracked("trader_check", async move {
        let valid = check_account_pubkey(&connection.connection, &address).await;
        let _ = event_tx.send(AppEvent::TraderChecked { address, valid }).await;
    });
}
