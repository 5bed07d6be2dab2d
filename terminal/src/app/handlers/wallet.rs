//! # Wallet Handlers
//!
//! Connecting a local keypair and disconnecting it. A wallet change makes the
//! exchange client reload with the new trader on the next tick.

use crate::app::state::{AppState, Notice};
use crate::services::{Modal, WalletError, WalletService, WalletStatus};
use parking_lot::RwLock;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::warn;

fn apply_load_result(state: &mut AppState, result: Result<Pubkey, WalletError>) {
    match result {
        Ok(pubkey) => {
            state.wallet = WalletStatus::Connected(pubkey);
            state.wallet_form.error = None;
            state.wallet_form.secret_key.clear();
            state.modals.close(Modal::ConnectWallet);
            state.notify(Notice::success("Wallet connected").short());
        }
        Err(e) => {
            warn!(error = %e, "Wallet connect failed");
            state.wallet_form.error = Some(e.to_string());
        }
    }
}

/// Internal handler function - use [`crate::app::App::handle_wallet_load_file`] instead.
pub(crate) fn handle_load_file(state: Arc<RwLock<AppState>>, wallet: &RwLock<WalletService>) {
    let path = state.read().wallet_form.keypair_path.trim().to_string();
    if path.is_empty() {
        state.write().wallet_form.error = Some("Enter a keypair file path".to_string());
        return;
    }
    let result = wallet.write().load_keypair_from_file(&path);
    apply_load_result(&mut state.write(), result);
}

/// Internal handler function - use [`crate::app::App::handle_wallet_load_secret`] instead.
pub(crate) fn handle_load_secret(state: Arc<RwLock<AppState>>, wallet: &RwLock<WalletService>) {
    let secret = state.read().wallet_form.secret_key.clone();
    if secret.trim().is_empty() {
        state.write().wallet_form.error = Some("Paste a base58 secret key".to_string());
        return;
    }
    let result = wallet.write().load_keypair_from_base58(&secret);
    apply_load_result(&mut state.write(), result);
}

/// Internal handler function - use [`crate::app::App::handle_wallet_disconnect`] instead.
pub(crate) fn handle_disconnect(state: Arc<RwLock<AppState>>, wallet: &RwLock<WalletService>) {
    wallet.write().disconnect();
    let mut state = state.write();
    state.wallet = WalletStatus::Disconnected;
    state.modals.close(Modal::ConnectWallet);
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signature::{Keypair, Signer};
    use std::io::Write;

    #[test]
    fn test_load_file_connects_and_closes_modal() {
        let keypair = Keypair::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap()).unwrap();

        let state = Arc::new(RwLock::new(AppState::default()));
        let wallet = RwLock::new(WalletService::new());
        {
            let mut s = state.write();
            s.modals.open(Modal::ConnectWallet);
            s.wallet_form.keypair_path = file.path().display().to_string();
        }

        handle_load_file(state.clone(), &wallet);

        let mut s = state.write();
        assert_eq!(s.wallet, WalletStatus::Connected(keypair.pubkey()));
        assert!(!s.modals.is_open(Modal::ConnectWallet));
        assert_eq!(s.take_notices().len(), 1);
        assert_eq!(wallet.read().pubkey(), Some(keypair.pubkey()));
    }

    #[test]
    fn test_bad_secret_reports_error() {
        let state = Arc::new(RwLock::new(AppState::default()));
        let wallet = RwLock::new(WalletService::new());
        state.write().wallet_form.secret_key = "not-base58-0OIl".to_string();

        handle_load_secret(state.clone(), &wallet);

        let s = state.read();
        assert!(s.wallet_form.error.is_some());
        assert!(!s.wallet.is_connected());
    }

    #[test]
    fn test_disconnect_clears_wallet() {
        let keypair = Keypair::new();
        let state = Arc::new(RwLock::new(AppState {
            wallet: WalletStatus::Connected(keypair.pubkey()),
            ..AppState::default()
        }));
        let wallet = RwLock::new(WalletService::from_keypair(keypair));

        handle_disconnect(state.clone(), &wallet);
        assert!(!state.read().wallet.is_connected());
        assert!(wallet.read().pubkey().is_none());
    }
}
