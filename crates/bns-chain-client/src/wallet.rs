use bns_api_types::{ChainId, WalletAddress};
use thiserror::Error;
use tracing::{info, warn};

use crate::{ProviderError, WalletProvider};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("no injected wallet provider")]
    ProviderMissing,
    #[error("wallet returned no accounts")]
    NoAccounts,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// What the wallet already knows about this origin at page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSnapshot {
    pub account: Option<WalletAddress>,
    pub chain_id: ChainId,
}

/// Account access over an optional injected provider.
pub struct WalletConnector<P> {
    provider: Option<P>,
}

impl<P: WalletProvider> WalletConnector<P> {
    pub fn new(provider: Option<P>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    /// Ask the wallet for account access; the first account becomes active.
    pub async fn connect(&self) -> Result<WalletAddress, WalletError> {
        let provider = self.provider.as_ref().ok_or(WalletError::ProviderMissing)?;
        let account = provider
            .request_accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(WalletError::NoAccounts)?;
        info!("connected {}", account);
        Ok(account)
    }

    /// Read authorized accounts and the active chain without prompting.
    ///
    /// Returns `Ok(None)` when no provider is injected.
    pub async fn check_connection(&self) -> Result<Option<ConnectionSnapshot>, WalletError> {
        let Some(provider) = self.provider.as_ref() else {
            warn!("no injected wallet found; make sure you have MetaMask");
            return Ok(None);
        };

        let account = provider.accounts().await?.into_iter().next();
        match &account {
            Some(account) => info!("found authorized account {}", account),
            None => info!("no authorized account found"),
        }

        let chain_id = provider.chain_id().await?;
        Ok(Some(ConnectionSnapshot { account, chain_id }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeWallet;

    #[tokio::test]
    async fn connect_without_provider_fails() {
        let connector: WalletConnector<FakeWallet> = WalletConnector::new(None);
        assert_eq!(connector.connect().await, Err(WalletError::ProviderMissing));
        assert_eq!(connector.check_connection().await, Ok(None));
    }

    #[tokio::test]
    async fn connect_takes_first_account() {
        let wallet = FakeWallet::with_accounts(&["0xAaA", "0xbbb"]);
        let connector = WalletConnector::new(Some(wallet));
        let account = connector.connect().await.unwrap();
        assert_eq!(account, WalletAddress("0xAaA".to_owned()));
        assert_eq!(connector.provider().unwrap().calls(), vec!["eth_requestAccounts"]);
    }

    #[tokio::test]
    async fn connect_with_empty_account_list_fails() {
        let connector = WalletConnector::new(Some(FakeWallet::with_accounts(&[])));
        assert_eq!(connector.connect().await, Err(WalletError::NoAccounts));
    }

    #[tokio::test]
    async fn check_connection_never_prompts() {
        let wallet = FakeWallet::with_accounts(&["0xabc"]);
        let connector = WalletConnector::new(Some(wallet));
        let snapshot = connector.check_connection().await.unwrap().unwrap();
        assert_eq!(snapshot.account, Some(WalletAddress("0xabc".to_owned())));
        assert_eq!(snapshot.chain_id, ChainId::new("0x1"));
        assert_eq!(
            connector.provider().unwrap().calls(),
            vec!["eth_accounts", "eth_chainId"]
        );
    }

    #[tokio::test]
    async fn check_connection_reports_unauthorized_origin() {
        let connector = WalletConnector::new(Some(FakeWallet::with_accounts(&[])));
        let snapshot = connector.check_connection().await.unwrap().unwrap();
        assert_eq!(snapshot.account, None);
    }
}
