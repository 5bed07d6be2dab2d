//! # Service Traits
//!
//! Traits for dependency injection, enabling better testability and modularity.
//!
//! Chain and Data API seams ([`lib_solana::MarketSource`], [`lib_solana::DataApi`],
//! [`lib_solana::RpcValidator`]) live in `lib-solana`; the traits here cover the
//! terminal's own collaborators.

use crate::services::geo::GeoInfo;
use crate::services::wallet::{WalletError, WalletService};
use async_trait::async_trait;
use parking_lot::RwLock;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

/// Signs swap transactions on behalf of the connected wallet.
pub trait TransactionSigner: Send + Sync {
    /// Public key of the connected wallet, if any.
    fn pubkey(&self) -> Option<Pubkey>;

    /// Sign `transaction` with `blockhash` and return the fee payer signature.
    fn sign(&self, transaction: &mut Transaction, blockhash: Hash) -> Result<Signature, WalletError>;
}

/// IP geolocation lookup.
#[async_trait]
pub trait GeoLookup: Send + Sync {
    async fn lookup(&self) -> crate::core::Result<GeoInfo>;
}

impl TransactionSigner for WalletService {
    fn pubkey(&self) -> Option<Pubkey> {
        WalletService::pubkey(self)
    }

    fn sign(&self, transaction: &mut Transaction, blockhash: Hash) -> Result<Signature, WalletError> {
        self.sign_transaction(transaction, blockhash)
    }
}

/// Shared wallet: the read lock is held only for the synchronous signing call.
impl TransactionSigner for RwLock<WalletService> {
    fn pubkey(&self) -> Option<Pubkey> {
        self.read().pubkey()
    }

    fn sign(&self, transaction: &mut Transaction, blockhash: Hash) -> Result<Signature, WalletError> {
        self.read().sign_transaction(transaction, blockhash)
    }
}
