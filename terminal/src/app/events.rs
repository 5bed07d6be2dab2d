//! # Application Events
//!
//! Results of background tasks, sent to the GUI thread over the event channel
//! and applied in [`crate::app::App::on_tick`].

use crate::services::connection::CustomEndpointOutcome;
use crate::services::exchange::ClientState;
use crate::services::swap::SwapOutcome;
use lib_solana::Cluster;
use solana_sdk::pubkey::Pubkey;

/// Async task results sent to main thread
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// An exchange client reload settled
    ClientReloaded { epoch: u64, state: ClientState },
    /// A swap submission finished (landed, cancelled or errored)
    SwapFinished {
        in_symbol: String,
        out_symbol: String,
        cluster: Cluster,
        outcome: Result<SwapOutcome, String>,
    },
    /// Custom RPC endpoint validated
    CustomRpcResult(CustomEndpointOutcome),
    /// Region check for the given cluster and market
    GeoChecked {
        cluster: Cluster,
        market: Pubkey,
        banned: bool,
    },
    /// Trader address looked up on chain
    TraderChecked { address: String, valid: bool },
}
