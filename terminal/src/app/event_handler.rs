//! # Event Handler
//!
//! Applies background task results to [`AppState`](crate::app::AppState).
//! Each event takes the state write lock once, for the duration of that event.

use crate::app::tasks::swap::SWAP_TOAST_ID;
use crate::app::{App, AppEvent, Notice};
use crate::services::connection::CustomEndpointOutcome;
use crate::services::swap::{success_message, SwapOutcome, SWAP_CANCELLED, SWAP_FAILED};
use crate::services::{ClientState, Modal};
use lib_solana::{Cluster, Explorer};
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info, warn};

/// Trait for event handling implementation
pub(crate) trait AppEventHandler {
    fn handle_event_impl(&mut self, event: AppEvent);
}

impl AppEventHandler for App {
    fn handle_event_impl(&mut self, event: AppEvent) {
        match event {
            AppEvent::ClientReloaded { epoch, state } => self.handle_client_reloaded(epoch, state),
            AppEvent::SwapFinished {
                in_symbol,
                out_symbol,
                cluster,
                outcome,
            } => self.handle_swap_finished(&in_symbol, &out_symbol, cluster, outcome),
            AppEvent::CustomRpcResult(outcome) => self.handle_custom_rpc_result(outcome),
            AppEvent::GeoChecked { cluster, market, banned } => self.handle_geo_checked(cluster, market, banned),
            AppEvent::TraderChecked { address, valid } => {
                debug!(trader = %address, valid, "Trader check finished");
                self.state.write().data.resolve_trader_check(&address, valid);
            }
        }
    }
}

/// Toast for a finished swap, and whether the form should keep its amount.
pub(crate) fn swap_notice(
    outcome: &Result<SwapOutcome, String>,
    in_symbol: &str,
    out_symbol: &str,
    explorer: Explorer,
    cluster: Cluster,
) -> (Notice, bool) {
    match outcome {
        Ok(SwapOutcome::Landed(receipt)) => {
            let link = explorer.tx_url(&receipt.signature.to_string(), cluster);
            match &receipt.on_chain_error {
                None => (
                    Notice::success(success_message(receipt, in_symbol, out_symbol)).with_link(link),
                    false,
                ),
                Some(_) => (Notice::error(SWAP_FAILED).with_link(link), true),
            }
        }
        Ok(SwapOutcome::Cancelled) => (Notice::plain(SWAP_CANCELLED).short(), false),
        Err(_) => (Notice::error(SWAP_FAILED), true),
    }
}

/// Toast for a settled reload. Reloads from an older epoch stay silent.
fn reload_notice(epoch: u64, current_epoch: u64, state: &ClientState) -> Option<Notice> {
    if epoch != current_epoch {
        debug!(epoch, current_epoch, "Ignoring superseded client reload");
        return None;
    }
    match state {
        ClientState::Failed(message) => Some(Notice::error(format!("Failed to load markets: {}", message))),
        other => {
            debug!(epoch, state = ?other, "Client reload settled");
            None
        }
    }
}

impl App {
    fn handle_client_reloaded(&mut self, epoch: u64, state: ClientState) {
        if let Some(notice) = reload_notice(epoch, self.services.exchange.epoch(), &state) {
            self.state.write().notify(notice);
        }
    }

    fn handle_swap_finished(
        &mut self,
        in_symbol: &str,
        out_symbol: &str,
        cluster: Cluster,
        outcome: Result<SwapOutcome, String>,
    ) {
        if let Err(e) = &outcome {
            warn!(error = %e, "Swap failed");
        }
        let explorer = self.services.settings.explorer();
        let (notice, failed) = swap_notice(&outcome, in_symbol, out_symbol, explorer, cluster);

        let mut state = self.state.write();
        state.swap.finish(failed);
        state.notify(notice.with_id(SWAP_TOAST_ID));
    }

    fn handle_custom_rpc_result(&mut self, outcome: CustomEndpointOutcome) {
        let mut state = self.state.write();
        state.settings_form.validating_rpc = false;
        match outcome {
            CustomEndpointOutcome::Connected(url) => {
                info!(endpoint = %url, "Custom RPC connected");
                state.notify(Notice::success("Connected to custom RPC").short());
            }
            CustomEndpointOutcome::Reset => {
                state.settings_form.custom_rpc.clear();
                state.notify(Notice::error("Invalid RPC endpoint. Reverted to the default."));
            }
        }
    }

    fn handle_geo_checked(&mut self, cluster: Cluster, market: Pubkey, banned: bool) {
        let mut state = self.state.write();
        if state.geo_checked_for != Some((cluster, market)) {
            return;
        }
        state.is_geobanned = banned;
        if banned && !state.modals.is_open(Modal::Geobanned) {
            info!(market = %market, "Swap restricted in this region");
            state.modals.open(Modal::Geobanned);
        }
    }
}
