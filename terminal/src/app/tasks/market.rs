//! # Market Tasks
//!
//! Exchange client reloads and the region check.

use crate::app::events::AppEvent;
use crate::app::state::{AppState, Notice};
use crate::app::Services;
use crate::core::service::GeoLookup;
use crate::debug::spawn_tracked;
use crate::services::connection::ConnectionHandle;
use crate::services::geo::is_geobanned;
use async_channel::Sender;
use lib_solana::Cluster;
use parking_lot::RwLock;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{error, info};

/// Load a fresh exchange client for `handle`, with `trader` balances when a
/// wallet is connected.
pub(crate) fn reload_client(
    state: Arc<RwLock<AppState>>,
    services: &Services,
    handle: Arc<ConnectionHandle>,
    trader: Option<Pubkey>,
    event_tx: Sender<AppEvent>,
) {
    let source = match (services.market_source)(&handle.connection) {
        Ok(source) => source,
        Err(e) => {
            error!(endpoint = %handle.endpoint(), error = %e, "Failed to create market source");
            state
                .write()
                .notify(Notice::error(format!("Failed to load markets: {}", e.user_message())));
            return;
        }
    };

    let exchange = services.exchange.clone();
    let cluster = handle.cluster;
    info!(cluster = %cluster, has_trader = trader.is_some(), "Reloading exchange client");

    spawn_tracked("exchange_reload", async move {
        let (epoch, state) = exchange.reload(source, cluster, trader).await;
        let _ = event_tx.send(AppEvent::ClientReloaded { epoch, state }).await;
    });
}

pub(crate) fn check_region(geo: Arc<dyn GeoLookup>, cluster: Cluster, market: Pubkey, event_tx: Sender<AppEvent>) {
    spawn_tracked("geo_check", async move {
        let banned = is_geobanned(geo.as_ref()).await;
        let _ = event_tx.send(AppEvent::GeoChecked { cluster, market, banned }).await;
    });
}
