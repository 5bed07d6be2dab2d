//! # Settings Handlers
//!
//! Theme, explorer, RPC endpoint and swap preferences. Every change is
//! persisted by [`SettingsService`] as it happens.

use crate::app::state::{AppState, Notice};
use crate::services::settings::custom_slippage_from_percent;
use crate::services::{ConnectionProvider, RpcOption, SettingsService};
use lib_solana::Explorer;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

pub(crate) fn handle_theme_toggle(settings: &SettingsService) {
    let mode = settings.theme_mode().toggled();
    settings.update_theme_mode(mode);
    info!(mode = ?mode, "Theme changed");
}

pub(crate) fn handle_explorer_select(settings: &SettingsService, explorer: Explorer) {
    settings.update_explorer(explorer);
    info!(explorer = explorer.name(), "Explorer changed");
}

/// Switch to a listed endpoint. The exchange client reloads on the next tick.
pub(crate) fn handle_rpc_select(state: Arc<RwLock<AppState>>, connection: &ConnectionProvider, option: RpcOption) {
    if connection.select_endpoint(option) {
        state
            .write()
            .notify(Notice::plain(format!("Switched to {}", option.label())).short());
    }
}

/// A preset slippage also clears the custom field.
pub(crate) fn handle_slippage_select(state: Arc<RwLock<AppState>>, settings: &SettingsService, slippage: f64) {
    settings.update_slippage(slippage);
    state.write().settings_form.custom_slippage.clear();
}

/// Apply the custom percent field; anything unusable falls back to the default.
pub(crate) fn handle_custom_slippage_submit(state: Arc<RwLock<AppState>>, settings: &SettingsService) {
    let mut state = state.write();
    let slippage = custom_slippage_from_percent(&state.settings_form.custom_slippage);
    settings.update_slippage(slippage);
    state.settings_form.custom_slippage = format!("{}", slippage * 100.0);
}

pub(crate) fn handle_priority_fee_select(settings: &SettingsService, priority_fee: f64) {
    settings.update_priority_fee(priority_fee);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::SettingsStore;
    use lib_solana::phoenix::DEFAULT_SLIPPAGE;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> SettingsService {
        let store = Arc::new(SettingsStore::open(dir.path().join("settings.json")));
        SettingsService::new(store, "https://api.mainnet-beta.solana.com")
    }

    #[test]
    fn test_theme_toggle_persists() {
        let dir = TempDir::new().unwrap();
        let settings = service(&dir);
        let before = settings.theme_mode();
        handle_theme_toggle(&settings);
        assert_eq!(settings.theme_mode(), before.toggled());

        let reopened = service(&dir);
        assert_eq!(reopened.theme_mode(), before.toggled());
    }

    #[test]
    fn test_custom_slippage_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let settings = service(&dir);
        let state = Arc::new(RwLock::new(AppState::default()));

        state.write().settings_form.custom_slippage = "2".to_string();
        handle_custom_slippage_submit(state.clone(), &settings);
        assert!((settings.swap_settings().slippage - 0.02).abs() < 1e-12);

        state.write().settings_form.custom_slippage = "abc".to_string();
        handle_custom_slippage_submit(state.clone(), &settings);
        assert_eq!(settings.swap_settings().slippage, DEFAULT_SLIPPAGE);
        assert_eq!(state.read().settings_form.custom_slippage, "0.5");
    }

    #[test]
    fn test_preset_slippage_clears_custom_field() {
        let dir = TempDir::new().unwrap();
        let settings = service(&dir);
        let state = Arc::new(RwLock::new(AppState::default()));
        state.write().settings_form.custom_slippage = "3".to_string();

        handle_slippage_select(state.clone(), &settings, 0.01);
        assert_eq!(settings.swap_settings().slippage, 0.01);
        assert!(state.read().settings_form.custom_slippage.is_empty());

        handle_priority_fee_select(&settings, 0.0001);
        assert_eq!(settings.swap_settings().priority_fee, 0.0001);
    }
}
