//! Registry reads and the mint/update transaction flows.

use alloy_primitives::U256;
use anyhow::{Context, Result, anyhow};
use bns_api_types::{NameRecord, WalletAddress};
use bns_pricing::{PricingError, PricingPolicy, display_price};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{RegistryContract, RegistryReader, TxReceipt};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum MintPhase {
    /// `register` confirmed; the record has not been written yet.
    Registered { register_tx: String },
    Complete { register_tx: String, record_tx: String },
}

/// A mint is two transactions: `register` then `setRecord`. The saga keeps
/// the intermediate state so a failed second step can be retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintSaga {
    pub domain: String,
    pub record: String,
    pub price_wei: U256,
    pub phase: MintPhase,
}

impl MintSaga {
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, MintPhase::Complete { .. })
    }
}

#[derive(Debug, Error)]
pub enum MintError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain must be at least {min} characters long")]
    DomainTooShort { len: usize, min: usize },
    #[error("no price configured for a {len}-character domain")]
    NoPriceTier { len: usize },
    #[error("register transaction {tx_hash} failed")]
    Rejected { tx_hash: String },
    #[error("register transaction could not be completed")]
    Transaction(#[source] anyhow::Error),
    #[error("{} was minted but its record was not set", .saga.domain)]
    Interrupted {
        saga: Box<MintSaga>,
        #[source]
        source: anyhow::Error,
    },
}

impl From<PricingError> for MintError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::EmptyDomain => Self::EmptyDomain,
            PricingError::TooShort { len, min } => Self::DomainTooShort { len, min },
            PricingError::NoTier { len } => Self::NoPriceTier { len },
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("domain and record are both required")]
    MissingInput,
    #[error("setRecord transaction {tx_hash} failed")]
    Rejected { tx_hash: String },
    #[error("setRecord transaction could not be completed")]
    Transaction(#[source] anyhow::Error),
}

pub struct RegistryClient<C> {
    contract: C,
    pricing: PricingPolicy,
    explorer_tx_url: Option<String>,
}

impl<C> RegistryClient<C> {
    pub fn new(contract: C, pricing: PricingPolicy) -> Self {
        Self {
            contract,
            pricing,
            explorer_tx_url: None,
        }
    }

    /// Transaction links in logs point at this explorer.
    pub fn with_explorer(mut self, explorer_tx_url: impl Into<String>) -> Self {
        self.explorer_tx_url = Some(explorer_tx_url.into());
        self
    }

    pub fn contract(&self) -> &C {
        &self.contract
    }

    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    fn tx_link(&self, tx_hash: &str) -> String {
        match &self.explorer_tx_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), tx_hash),
            None => tx_hash.to_owned(),
        }
    }
}

impl<C: RegistryReader> RegistryClient<C> {
    /// Every registered name with its record and owner. Per-name lookups run
    /// concurrently; the first failure fails the whole fetch.
    pub async fn fetch_all(&self) -> Result<Vec<NameRecord>> {
        let names = self.contract.all_names().await.context("getAllNames")?;

        let lookups = names.into_iter().enumerate().map(|(id, name)| async move {
            let (record, owner) = futures::try_join!(
                self.contract.record(&name),
                self.contract.owner(&name)
            )
            .with_context(|| format!("lookup for {name}"))?;
            Ok::<_, anyhow::Error>(NameRecord {
                id,
                name,
                record,
                owner,
            })
        });

        let records = try_join_all(lookups).await?;
        info!(count = records.len(), "names fetched");
        Ok(records)
    }
}

impl<C: RegistryContract> RegistryClient<C> {
    /// Register `domain` at its tier price, then write `record` to it.
    pub async fn mint(
        &self,
        from: &WalletAddress,
        domain: &str,
        record: &str,
    ) -> Result<MintSaga, MintError> {
        let price_wei = self.pricing.price_for(domain)?;
        info!(domain, price = %display_price(price_wei), "minting domain");

        let receipt = self
            .submit_and_wait(self.contract.register(from, domain, price_wei))
            .await
            .map_err(MintError::Transaction)?;
        if !receipt.success {
            warn!("register reverted: {}", self.tx_link(&receipt.tx_hash));
            return Err(MintError::Rejected {
                tx_hash: receipt.tx_hash,
            });
        }
        info!("domain minted: {}", self.tx_link(&receipt.tx_hash));

        let saga = MintSaga {
            domain: domain.to_owned(),
            record: record.to_owned(),
            price_wei,
            phase: MintPhase::Registered {
                register_tx: receipt.tx_hash,
            },
        };
        self.write_record(from, saga).await
    }

    /// Retry the record step of an interrupted mint.
    pub async fn resume(&self, from: &WalletAddress, saga: MintSaga) -> Result<MintSaga, MintError> {
        if saga.is_complete() {
            return Ok(saga);
        }
        info!(domain = %saga.domain, "resuming mint");
        self.write_record(from, saga).await
    }

    async fn write_record(&self, from: &WalletAddress, mut saga: MintSaga) -> Result<MintSaga, MintError> {
        let register_tx = match &saga.phase {
            MintPhase::Registered { register_tx } => register_tx.clone(),
            MintPhase::Complete { .. } => return Ok(saga),
        };

        let outcome = self
            .submit_and_wait(self.contract.set_record(from, &saga.domain, &saga.record))
            .await
            .and_then(|receipt| {
                if receipt.success {
                    Ok(receipt)
                } else {
                    Err(anyhow!("setRecord transaction {} reverted", receipt.tx_hash))
                }
            });

        match outcome {
            Ok(receipt) => {
                info!("record set: {}", self.tx_link(&receipt.tx_hash));
                saga.phase = MintPhase::Complete {
                    register_tx,
                    record_tx: receipt.tx_hash,
                };
                Ok(saga)
            }
            Err(source) => {
                warn!(domain = %saga.domain, "record step failed: {:#}", source);
                Err(MintError::Interrupted {
                    saga: Box::new(saga),
                    source,
                })
            }
        }
    }

    /// Overwrite the record of a name. Ownership is left to the contract.
    pub async fn update_record(
        &self,
        from: &WalletAddress,
        domain: &str,
        record: &str,
    ) -> Result<TxReceipt, UpdateError> {
        if domain.is_empty() || record.is_empty() {
            return Err(UpdateError::MissingInput);
        }
        info!(domain, "updating record");

        let receipt = self
            .submit_and_wait(self.contract.set_record(from, domain, record))
            .await
            .map_err(UpdateError::Transaction)?;
        if !receipt.success {
            warn!("setRecord reverted: {}", self.tx_link(&receipt.tx_hash));
            return Err(UpdateError::Rejected {
                tx_hash: receipt.tx_hash,
            });
        }
        info!("record set: {}", self.tx_link(&receipt.tx_hash));
        Ok(receipt)
    }

    async fn submit_and_wait(
        &self,
        submit: impl std::future::Future<Output = Result<crate::PendingTx>>,
    ) -> Result<TxReceipt> {
        let pending = submit.await?;
        self.contract.wait_for_receipt(&pending).await
    }
}
