//! # Services Module
//!
//! Long-lived providers behind the GUI. Each owns its own shared state and
//! background timers; the UI reads snapshots and never holds a provider lock
//! across a frame.
//!
//! ```text
//! services/
//! ├── settings.rs   - JSON settings store + typed facade
//! ├── connection.rs - active RPC connection, custom endpoint flow, TPS poller
//! ├── exchange.rs   - Phoenix markets/tokens/trader snapshot (1.5s refresh)
//! ├── data.rs       - Data API datasets on fast/medium/slow cadences
//! ├── modals.rs     - ordered set of open modals
//! ├── query.rs      - route + query string (`market`, `trader`)
//! ├── wallet.rs     - local keypair signing
//! ├── geo.rs        - region restriction check
//! ├── swap.rs       - token selection, quick swap, transaction submission
//! └── poll.rs       - cancel-on-drop interval timers
//! ```
//!
//! ## Dependency Flow
//!
//! ```text
//! SettingsService ──► ConnectionProvider ──► ExchangeClientProvider
//!                                                   │ selected market
//!                          QueryParams ◄────────────┤
//!                                                   ▼
//!                                        AnalyticsDataProvider
//! ```

pub mod connection;
pub mod data;
pub mod exchange;
pub mod geo;
pub mod modals;
pub mod poll;
pub mod query;
pub mod settings;
pub mod swap;
pub mod wallet;

#[cfg(test)]
pub(crate) mod fixtures;

pub use connection::{ConnectionProvider, RpcOption, TpsReading};
pub use data::{AnalyticsDataProvider, DataKey, DataTab};
pub use exchange::{ClientState, ExchangeClientProvider, ExchangeSnapshot};
pub use geo::GeoService;
pub use modals::{Modal, ModalCoordinator};
pub use poll::PollHandle;
pub use query::{QueryParams, Route};
pub use settings::{SettingsService, SettingsStore, ThemeMode};
pub use wallet::{WalletError, WalletService, WalletStatus};
