//! Wallet and registry seams plus the orchestration built on them.
//!
//! Everything here runs on a single-threaded event loop, so the traits are
//! `?Send`.

use alloy_primitives::U256;
use anyhow::Result;
use async_trait::async_trait;
use bns_api_types::{AddChainParams, ChainId, SwitchChainParams, WalletAddress};
use thiserror::Error;

pub mod network;
pub mod registry;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testing;

pub use network::{NetworkGuard, NetworkStatus, SwitchOutcome};
pub use registry::{MintError, MintPhase, MintSaga, RegistryClient, UpdateError};
pub use wallet::{ConnectionSnapshot, WalletConnector, WalletError};

/// Error surfaced by an EIP-1193 provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("provider error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("provider transport failed: {0}")]
    Transport(String),
    #[error("unexpected provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    pub const USER_REJECTED: i64 = 4001;
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    /// The wallet does not know the requested chain.
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;

    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTx {
    pub tx_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub success: bool,
}

#[async_trait(?Send)]
pub trait WalletProvider {
    /// Prompts the user for account access.
    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ProviderError>;
    /// Accounts already authorized for this origin; never prompts.
    async fn accounts(&self) -> Result<Vec<WalletAddress>, ProviderError>;
    async fn chain_id(&self) -> Result<ChainId, ProviderError>;
    async fn switch_chain(&self, params: &SwitchChainParams) -> Result<(), ProviderError>;
    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError>;
}

#[async_trait(?Send)]
pub trait RegistryReader {
    async fn all_names(&self) -> Result<Vec<String>>;
    async fn record(&self, name: &str) -> Result<String>;
    async fn owner(&self, name: &str) -> Result<WalletAddress>;
}

#[async_trait(?Send)]
pub trait RegistryContract: RegistryReader {
    async fn register(&self, from: &WalletAddress, name: &str, value: U256) -> Result<PendingTx>;
    async fn set_record(&self, from: &WalletAddress, name: &str, record: &str) -> Result<PendingTx>;
    async fn wait_for_receipt(&self, tx: &PendingTx) -> Result<TxReceipt>;
}
