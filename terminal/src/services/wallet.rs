//! # Wallet Service
//!
//! Holds the local keypair used to sign swaps.
//!
//! ## Features
//! - Load a keypair from a Solana CLI JSON byte-array file
//! - Load a keypair from a base58 secret key
//! - Sign transactions against a caller-supplied blockhash
//! - Disconnect (drops the keypair)
//!
//! Both 64-byte keypairs and 32-byte secret seeds are accepted.

use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Wallet errors
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Keypair load error: {0}")]
    KeypairLoad(String),

    #[error("Invalid keypair: {0}")]
    InvalidKeypair(String),

    #[error("Signing error: {0}")]
    Signing(String),

    /// The wallet went away before the transaction could be signed.
    #[error("Signing rejected: {0}")]
    Rejected(String),
}

/// Wallet connection status
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WalletStatus {
    #[default]
    Disconnected,
    Connected(Pubkey),
}

impl WalletStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, WalletStatus::Connected(_))
    }

    pub fn pubkey(&self) -> Option<Pubkey> {
        match self {
            WalletStatus::Connected(pk) => Some(*pk),
            WalletStatus::Disconnected => None,
        }
    }
}

#[derive(Default)]
pub struct WalletService {
    keypair: Option<Keypair>,
}

impl std::fmt::Debug for WalletService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletService")
            .field("pubkey", &self.pubkey())
            .finish()
    }
}

fn keypair_from_bytes(bytes: &[u8]) -> Result<Keypair, WalletError> {
    match bytes.len() {
        64 => Keypair::try_from(bytes).map_err(|e| WalletError::InvalidKeypair(e.to_string())),
        32 => {
            let mut seed = [0u8; 32];
            seed.copy_from_slice(bytes);
            Ok(Keypair::new_from_array(seed))
        }
        n => Err(WalletError::InvalidKeypair(format!("Expected 64 or 32 bytes, got {}", n))),
    }
}

impl WalletService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            keypair: Some(keypair),
        }
    }

    /// Load a keypair file: a JSON byte array (Solana CLI format) or a base58 string.
    pub fn load_keypair_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Pubkey, WalletError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| WalletError::KeypairLoad(format!("Failed to read {}: {}", path.display(), e)))?;

        if contents.trim_start().starts_with('[') {
            let bytes: Vec<u8> = serde_json::from_str(&contents)
                .map_err(|e| WalletError::InvalidKeypair(format!("Invalid JSON format: {}", e)))?;
            self.install(keypair_from_bytes(&bytes)?)
        } else {
            self.load_keypair_from_base58(&contents)
        }
    }

    /// Load a base58 encoded secret key.
    pub fn load_keypair_from_base58(&mut self, base58_key: &str) -> Result<Pubkey, WalletError> {
        let bytes = bs58::decode(base58_key.trim())
            .into_vec()
            .map_err(|e| WalletError::InvalidKeypair(format!("Invalid base58: {}", e)))?;
        self.install(keypair_from_bytes(&bytes)?)
    }

    fn install(&mut self, keypair: Keypair) -> Result<Pubkey, WalletError> {
        let pubkey = keypair.pubkey();
        self.keypair = Some(keypair);
        info!(wallet = %pubkey, "Wallet connected");
        Ok(pubkey)
    }

    pub fn pubkey(&self) -> Option<Pubkey> {
        self.keypair.as_ref().map(|kp| kp.pubkey())
    }

    pub fn status(&self) -> WalletStatus {
        match self.pubkey() {
            Some(pk) => WalletStatus::Connected(pk),
            None => WalletStatus::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.keypair.is_some()
    }

    /// Sign `transaction` with `blockhash`; returns the fee payer signature.
    pub fn sign_transaction(&self, transaction: &mut Transaction, blockhash: Hash) -> Result<Signature, WalletError> {
        let keypair = self
            .keypair
            .as_ref()
            .ok_or_else(|| WalletError::Rejected("Wallet disconnected".to_string()))?;

        transaction
            .try_sign(&[keypair], blockhash)
            .map_err(|e| WalletError::Signing(e.to_string()))?;

        transaction
            .signatures
            .first()
            .copied()
            .ok_or_else(|| WalletError::Signing("No signature generated".to_string()))
    }

    pub fn disconnect(&mut self) {
        if let Some(pk) = self.pubkey() {
            info!(wallet = %pk, "Wallet disconnected");
        }
        self.keypair = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::message::Message;
    use std::io::Write;

    #[test]
    fn test_wallet_starts_disconnected() {
        let wallet = WalletService::new();
        assert!(!wallet.is_connected());
        assert_eq!(wallet.status(), WalletStatus::Disconnected);
    }

    #[test]
    fn test_load_cli_keypair_file() {
        let keypair = Keypair::new();
        let bytes: Vec<u8> = keypair.to_bytes().to_vec();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&bytes).unwrap()).unwrap();

        let mut wallet = WalletService::new();
        let pubkey = wallet.load_keypair_from_file(file.path()).unwrap();
        assert_eq!(pubkey, keypair.pubkey());
        assert_eq!(wallet.status(), WalletStatus::Connected(keypair.pubkey()));
    }

    #[test]
    fn test_load_base58_keypair() {
        let keypair = Keypair::new();
        let encoded = bs58::encode(keypair.to_bytes()).into_string();

        let mut wallet = WalletService::new();
        assert_eq!(wallet.load_keypair_from_base58(&encoded).unwrap(), keypair.pubkey());
    }

    #[test]
    fn test_rejects_wrong_length() {
        let mut wallet = WalletService::new();
        let err = wallet.load_keypair_from_base58(&bs58::encode([1u8; 10]).into_string());
        assert!(matches!(err, Err(WalletError::InvalidKeypair(_))));
        assert!(!wallet.is_connected());
    }

    #[test]
    fn test_sign_and_disconnect() {
        let keypair = Keypair::new();
        let payer = keypair.pubkey();
        let mut wallet = WalletService::from_keypair(keypair);

        let message = Message::new(&[], Some(&payer));
        let mut tx = Transaction::new_unsigned(message);
        let signature = wallet.sign_transaction(&mut tx, Hash::default()).unwrap();
        assert_eq!(tx.signatures[0], signature);

        wallet.disconnect();
        let mut tx = Transaction::new_unsigned(Message::new(&[], Some(&payer)));
        assert!(matches!(
            wallet.sign_transaction(&mut tx, Hash::default()),
            Err(WalletError::Rejected(_))
        ));
    }
}
