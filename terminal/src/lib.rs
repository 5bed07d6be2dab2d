//! # Phoenix Swap Terminal - Library Root
//!
//! Native desktop client for Phoenix order-book markets on Solana: a
//! single-market swap form and a market/trader analytics view.
//! This library crate contains all modules used by the binary crate (`main.rs`).
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              terminal (this crate)                     │
//! ├────────────────────────────────────────────────────────┤
//! │  eframe/egui   - Native window, immediate-mode GUI     │
//! │  egui_plot     - Volume and price charts               │
//! │  Tokio         - Pollers and background tasks          │
//! │  lib-solana    - RPC, Phoenix markets, Data API        │
//! └────────────────────────────────────────────────────────┘
//!          │                              │
//!          │ HTTPS (X-API-Key)            │ Solana RPC
//!          ▼                              ▼
//! ┌─────────────────┐          ┌─────────────────────────┐
//! │ Phoenix Data API│          │   Solana Network        │
//! │ (analytics)     │          │   (mainnet-beta/devnet) │
//! └─────────────────┘          └─────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - **app**: [`app::App`] orchestrator, [`app::AppState`], handlers and tasks
//! - **services**: settings, connection, exchange client, analytics data,
//!   modals, wallet, geo check, swap flow
//! - **ui**: eframe app, screens, modals, widgets, theme
//! - **core**: error type and the service traits used for test doubles
//! - **debug**: logging setup and tracked task spawning
//!
//! ## Event Flow
//!
//! ```text
//! egui frame ──► App::handle_*() ──► handlers (sync) / tasks (tokio)
//!                                              │
//!      App::on_tick() ◄── async_channel ◄──────┘
//! ```

pub mod app;
pub mod core;
pub mod debug;
pub mod services;
pub mod ui;
