//! # Application Orchestrator
//!
//! The [`App`] struct sits between the egui frame loop, the long-lived
//! services, and the background tasks they spawn.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Main Thread (egui)                      │
//! │  App::on_tick()        drain events, resync services     │
//! │  App::handle_*()       user actions -> handlers/tasks    │
//! │  state: Arc<RwLock<AppState>>   forms, modals, notices   │
//! └──────────────────────────┬───────────────────────────────┘
//!                            │ async_channel (unbounded)
//! ┌──────────────────────────▼───────────────────────────────┐
//! │                  Tokio Runtime                           │
//! │  tasks::market   exchange reloads, region check          │
//! │  tasks::swap     transaction submission                  │
//! │  tasks::network  custom RPC validation, trader lookup    │
//! │  services        exchange refresh, TPS, data cadences    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Provider data (markets, datasets, settings) is read straight from the
//! services each frame; [`AppState`] only holds what the user is editing.
//! Locks on either side are held for the duration of a single read or write.

mod event_handler;
mod events;
pub(crate) mod handlers;
mod state;
pub(crate) mod tasks;

pub use events::AppEvent;
pub use state::*;

use crate::core::service::GeoLookup;
use crate::services::geo::GeoService;
use crate::services::{
    AnalyticsDataProvider, ConnectionProvider, DataKey, DataTab, ExchangeClientProvider, Modal, PollHandle,
    QueryParams, RpcOption, SettingsService, SettingsStore, WalletService,
};
use async_channel::{unbounded, Receiver, Sender};
use event_handler::AppEventHandler;
use lib_core::config::Config;
use lib_solana::client::VersionProbe;
use lib_solana::{Cluster, Connection, DataApiClient, Explorer, MarketSource, RpcMarketSource, Token};
use parking_lot::RwLock;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Builds the market source for a freshly opened connection.
pub type SourceFactory = Arc<dyn Fn(&Connection) -> lib_core::Result<Arc<dyn MarketSource>> + Send + Sync>;

// region: --- Services

/// Every long-lived provider, wired together once at startup.
#[derive(Clone)]
pub struct Services {
    pub settings: Arc<SettingsService>,
    pub connection: Arc<ConnectionProvider>,
    pub exchange: Arc<ExchangeClientProvider>,
    pub data: Arc<AnalyticsDataProvider>,
    pub wallet: Arc<RwLock<WalletService>>,
    pub geo: Arc<dyn GeoLookup>,
    pub query: Arc<RwLock<QueryParams>>,
    pub market_source: SourceFactory,
}

impl Services {
    /// Wire the providers from the process configuration.
    ///
    /// A configured keypair that fails to load is logged and the wallet
    /// starts disconnected.
    pub fn from_config(config: &Config) -> crate::core::Result<Self> {
        let store = Arc::new(SettingsStore::open(config.settings_path.clone()));
        let settings = Arc::new(SettingsService::new(store, config.default_mainnet_endpoint()));
        let connection = Arc::new(ConnectionProvider::new(
            settings.clone(),
            config.default_devnet_endpoint(),
            Arc::new(VersionProbe),
        ));

        let query = Arc::new(RwLock::new(QueryParams::new()));
        let exchange = Arc::new(ExchangeClientProvider::new(query.clone()));

        let api = DataApiClient::builder().api_key(config.data_api_key.clone()).build()?;
        let data = Arc::new(AnalyticsDataProvider::new(Arc::new(api), query.clone()));

        let mut wallet = WalletService::new();
        if let Some(path) = &config.wallet_keypair_path {
            match wallet.load_keypair_from_file(path) {
                Ok(pubkey) => info!(wallet = %pubkey, "Wallet keypair loaded"),
                Err(e) => warn!(path = %path.display(), error = %e, "Configured wallet keypair not loaded"),
            }
        }

        let config_url = config.market_config_url.clone();
        let market_source: SourceFactory = Arc::new(move |connection: &Connection| {
            let source = RpcMarketSource::new(connection.clone(), config_url.clone())?;
            Ok(Arc::new(source) as Arc<dyn MarketSource>)
        });

        Ok(Self {
            settings,
            connection,
            exchange,
            data,
            wallet: Arc::new(RwLock::new(wallet)),
            geo: Arc::new(GeoService::new()?),
            query,
            market_source,
        })
    }
}

// endregion: --- Services

/// Main application orchestrator.
pub struct App {
    /// Forms, modals and queued notices. Hold locks briefly.
    pub state: Arc<RwLock<AppState>>,
    pub services: Services,
    event_rx: Receiver<AppEvent>,
    event_tx: Sender<AppEvent>,
    /// Endpoint and wallet the exchange client was last loaded for
    client_key: Option<(String, Option<Pubkey>)>,
    _exchange_poll: PollHandle,
    _tps_poll: PollHandle,
}

impl App {
    /// Create the app and start the background pollers. Must run inside a
    /// Tokio runtime context.
    pub fn new(services: Services) -> Self {
        let (event_tx, event_rx) = unbounded();

        let mut state = AppState {
            wallet: services.wallet.read().status(),
            ..AppState::default()
        };
        state.data.tab = DataTab::initial(&services.query.read());
        let rpc = services.settings.rpc_endpoint();
        state.settings_form.custom_rpc = rpc
            .custom
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .to_string();

        let exchange_poll = services.exchange.start_polling();
        let tps_poll = services.connection.start_tps_polling();

        info!(
            cluster = %services.connection.cluster(),
            wallet_connected = state.wallet.is_connected(),
            "Swap terminal started"
        );

        Self {
            state: Arc::new(RwLock::new(state)),
            services,
            event_rx,
            event_tx,
            client_key: None,
            _exchange_poll: exchange_poll,
            _tps_poll: tps_poll,
        }
    }

    /// Called once per frame, before rendering.
    pub fn on_tick(&mut self) {
        let start = Instant::now();
        let mut events_processed = 0u32;
        while let Ok(event) = self.event_rx.try_recv() {
            events_processed += 1;
            self.handle_event_impl(event);
        }
        if events_processed > 0 {
            let elapsed = start.elapsed();
            debug!(
                events_processed,
                processing_time_us = elapsed.as_micros() as u64,
                "on_tick: processed events"
            );
            if elapsed.as_millis() > 5 {
                warn!(
                    events_processed,
                    processing_time_ms = elapsed.as_millis() as u64,
                    "Event processing took longer than 5ms"
                );
            }
        }

        self.sync_client();
        self.sync_swap_form();
        self.sync_region_check();
        self.sync_data_key();
    }

    pub fn event_tx(&self) -> Sender<AppEvent> {
        self.event_tx.clone()
    }

    // region: --- Per-frame sync

    /// Reload the exchange client when the endpoint or wallet changed.
    fn sync_client(&mut self) {
        let handle = self.services.connection.current();
        let trader = self.services.wallet.read().pubkey();
        let key = (handle.endpoint().to_string(), trader);
        if self.client_key.as_ref() == Some(&key) {
            return;
        }
        self.client_key = Some(key);
        tasks::market::reload_client(self.state.clone(), &self.services, handle, trader, self.event_tx.clone());
    }

    /// Reset the form tokens when the selected market changes.
    fn sync_swap_form(&mut self) {
        let Some(market) = self.services.exchange.selected_market() else {
            return;
        };
        let snapshot = self.services.exchange.snapshot();
        let mut state = self.state.write();
        if state.swap.sync_market(&market, &snapshot.tokens) {
            debug!(market = %market.name, "Swap form synced to market");
        }
    }

    /// Run the region check once per mainnet market.
    fn sync_region_check(&mut self) {
        let cluster = self.services.connection.cluster();
        if cluster != Cluster::MainnetBeta {
            return;
        }
        let Some(market) = self.services.exchange.selected_market() else {
            return;
        };
        {
            let mut state = self.state.write();
            if state.geo_checked_for == Some((cluster, market.address)) {
                return;
            }
            state.geo_checked_for = Some((cluster, market.address));
        }
        tasks::market::check_region(self.services.geo.clone(), cluster, market.address, self.event_tx.clone());
    }

    fn sync_data_key(&mut self) {
        let key = {
            let state = self.state.read();
            DataKey {
                route: state.current_screen.route(),
                tab: state.data.tab,
                cluster: self.services.connection.cluster(),
                market: self.services.exchange.selected_market().map(|m| m.address.to_string()),
                trader: Some(state.data.trader.clone()).filter(|t| !t.is_empty()),
                start_ms: state.data.start_ms,
                end_ms: state.data.end_ms,
            }
        };
        self.services.data.set_key(key);
    }

    // endregion: --- Per-frame sync

    // region: --- User actions

    pub fn handle_screen_change(&mut self, screen: Screen) {
        handlers::navigation::handle_screen_change(self.state.clone(), screen);
    }

    pub fn open_modal(&mut self, modal: Modal) {
        handlers::navigation::open_modal(self.state.clone(), modal);
    }

    pub fn close_modal(&mut self, modal: Modal) {
        handlers::navigation::close_modal(self.state.clone(), modal);
    }

    /// "Get me out of here" on the region modal.
    pub fn handle_leave_swap(&mut self) {
        handlers::navigation::handle_leave_swap(self.state.clone());
    }

    pub fn handle_swap_execute_click(&mut self) {
        tasks::swap::execute_swap(self.state.clone(), &self.services, self.event_tx.clone());
    }

    /// Open the token modal for one side of the form.
    pub fn open_token_select(&mut self, slot: TokenSlot) {
        handlers::swap::open_token_select(self.state.clone(), slot);
    }

    pub fn handle_token_select(&mut self, token: Token) {
        handlers::swap::handle_token_select(self.state.clone(), &self.services.exchange, token);
    }

    pub fn handle_flip(&mut self) {
        handlers::swap::handle_flip(self.state.clone(), &self.services.exchange);
    }

    pub fn handle_quick_swap_submit(&mut self) {
        handlers::swap::handle_quick_swap_submit(self.state.clone(), &self.services.exchange);
    }

    pub fn handle_max_amount(&mut self) {
        handlers::swap::handle_max_amount(self.state.clone(), &self.services.exchange);
    }

    pub fn handle_market_select(&mut self, address: Pubkey) {
        handlers::data::handle_market_select(self.state.clone(), &self.services.exchange, &address);
    }

    pub fn handle_slippage_select(&mut self, slippage: f64) {
        handlers::settings::handle_slippage_select(self.state.clone(), &self.services.settings, slippage);
    }

    pub fn handle_custom_slippage_submit(&mut self) {
        handlers::settings::handle_custom_slippage_submit(self.state.clone(), &self.services.settings);
    }

    pub fn handle_priority_fee_select(&mut self, priority_fee: f64) {
        handlers::settings::handle_priority_fee_select(&self.services.settings, priority_fee);
    }

    pub fn handle_theme_toggle(&mut self) {
        handlers::settings::handle_theme_toggle(&self.services.settings);
    }

    pub fn handle_explorer_select(&mut self, explorer: Explorer) {
        handlers::settings::handle_explorer_select(&self.services.settings, explorer);
    }

    pub fn handle_rpc_select(&mut self, option: RpcOption) {
        handlers::settings::handle_rpc_select(self.state.clone(), &self.services.connection, option);
    }

    pub fn handle_custom_rpc_submit(&mut self) {
        tasks::network::submit_custom_rpc(self.state.clone(), self.services.connection.clone(), self.event_tx.clone());
    }

    pub fn handle_wallet_load_file(&mut self) {
        handlers::wallet::handle_load_file(self.state.clone(), &self.services.wallet);
    }

    pub fn handle_wallet_load_secret(&mut self) {
        handlers::wallet::handle_load_secret(self.state.clone(), &self.services.wallet);
    }

    pub fn handle_wallet_disconnect(&mut self) {
        handlers::wallet::handle_disconnect(self.state.clone(), &self.services.wallet);
    }

    pub fn handle_data_tab_change(&mut self, tab: DataTab) {
        handlers::data::handle_tab_change(self.state.clone(), tab);
    }

    /// Trader key field edited.
    pub fn handle_trader_input(&mut self, input: String) {
        let address = handlers::data::handle_trader_input(self.state.clone(), input);
        if let Some(address) = address {
            let connection = self.services.connection.current();
            tasks::network::check_trader(connection, address, self.event_tx.clone());
        }
    }

    pub fn handle_start_days(&mut self, days_back: Option<u32>) {
        handlers::data::handle_start_days(self.state.clone(), days_back);
    }

    pub fn handle_end_days(&mut self, days_back: Option<u32>) {
        handlers::data::handle_end_days(self.state.clone(), days_back);
    }

    /// Taker or maker clicked in the fills table.
    pub fn handle_show_trader(&mut self, address: &str) {
        handlers::data::handle_show_trader(self.state.clone(), address);
    }

    // endregion: --- User actions
}

impl Drop for App {
    fn drop(&mut self) {
        self.services.data.stop();
        debug!("App dropped, background polling stopped");
    }
}

