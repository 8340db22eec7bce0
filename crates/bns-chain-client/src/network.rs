use bns_api_types::{AddChainParams, AppConfig, ChainId, NetworkTable, SwitchChainParams};
use tracing::{info, warn};

use crate::{ProviderError, WalletProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkStatus {
    Ready,
    WrongNetwork { current: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    Switched,
    /// The wallet did not know the chain, so it was added.
    Added,
    Failed(ProviderError),
}

/// Gates mint/edit on the required network.
#[derive(Debug, Clone)]
pub struct NetworkGuard {
    target: AddChainParams,
    table: NetworkTable,
}

impl NetworkGuard {
    pub fn new(target: AddChainParams, table: NetworkTable) -> Self {
        Self { target, table }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.target_network.clone(), config.networks.clone())
    }

    pub fn label(&self, chain_id: &ChainId) -> Option<&str> {
        self.table.label(chain_id)
    }

    pub fn required_label(&self) -> &str {
        &self.target.chain_name
    }

    pub fn check(&self, chain_id: &ChainId) -> NetworkStatus {
        match self.label(chain_id) {
            Some(label) if label == self.required_label() => NetworkStatus::Ready,
            other => NetworkStatus::WrongNetwork {
                current: other.map(str::to_owned),
            },
        }
    }

    /// Switch the wallet to the target chain, adding it first when the wallet
    /// reports it as unknown. Failures are logged and returned, never raised.
    pub async fn switch_network<P>(&self, provider: &P) -> SwitchOutcome
    where
        P: WalletProvider + ?Sized,
    {
        let params = SwitchChainParams {
            chain_id: self.target.chain_id.clone(),
        };
        let err = match provider.switch_chain(&params).await {
            Ok(()) => {
                info!("switched wallet to {}", self.target.chain_id);
                return SwitchOutcome::Switched;
            }
            Err(err) => err,
        };

        if err.code() != Some(ProviderError::UNRECOGNIZED_CHAIN) {
            warn!("network switch failed: {}", err);
            return SwitchOutcome::Failed(err);
        }

        match provider.add_chain(&self.target).await {
            Ok(()) => {
                info!("added {} to wallet", self.target.chain_name);
                SwitchOutcome::Added
            }
            Err(err) => {
                warn!("adding {} failed: {}", self.target.chain_name, err);
                SwitchOutcome::Failed(err)
            }
        }
    }
}
