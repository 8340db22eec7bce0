use std::time::Duration;

use alloy_primitives::{Address, U256, hex};
use alloy_sol_types::SolCall;
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use bns_api_types::{AddChainParams, ChainId, ReceiptPolling, SwitchChainParams, WalletAddress};
use bns_chain_client::{
    PendingTx, ProviderError, RegistryContract, RegistryReader, TxReceipt, WalletProvider,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

pub mod abi;
#[cfg(feature = "http")]
pub mod http;

use abi::BunnyRegistry;

/// EIP-1193 `request` plus a way to yield to the host runtime between
/// receipt polls.
#[async_trait(?Send)]
pub trait Transport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;
    async fn sleep(&self, duration: Duration);
}

/// Wallet and registry access over any EIP-1193 transport.
pub struct Eip1193Provider<T> {
    transport: T,
    contract: Address,
    polling: ReceiptPolling,
}

impl<T: Transport> Eip1193Provider<T> {
    pub fn new(transport: T, contract: &str, polling: ReceiptPolling) -> Result<Self> {
        let contract = contract
            .parse::<Address>()
            .with_context(|| format!("invalid registry address {contract}"))?;
        Ok(Self {
            transport,
            contract,
            polling,
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call<C: SolCall>(&self, call: C) -> Result<C::Return> {
        let params = json!([
            { "to": self.contract.to_string(), "data": hex::encode_prefixed(call.abi_encode()) },
            "latest"
        ]);
        let raw = self.transport.request("eth_call", params).await?;
        let raw = raw
            .as_str()
            .ok_or_else(|| anyhow!("eth_call returned {raw}"))?;
        let bytes = hex::decode(raw).context("eth_call result is not hex")?;
        C::abi_decode_returns(&bytes, true).with_context(|| format!("decoding {}", C::SIGNATURE))
    }

    async fn send<C: SolCall>(&self, from: &WalletAddress, call: C, value: Option<U256>) -> Result<PendingTx> {
        let mut tx = json!({
            "from": from.0,
            "to": self.contract.to_string(),
            "data": hex::encode_prefixed(call.abi_encode()),
        });
        if let Some(value) = value {
            tx["value"] = Value::String(format!("0x{value:x}"));
        }
        debug!(method = C::SIGNATURE, "eth_sendTransaction");
        let hash = self
            .transport
            .request("eth_sendTransaction", json!([tx]))
            .await
            .with_context(|| format!("sending {}", C::SIGNATURE))?;
        let tx_hash = hash
            .as_str()
            .ok_or_else(|| anyhow!("eth_sendTransaction returned {hash}"))?
            .to_owned();
        Ok(PendingTx { tx_hash })
    }

    async fn addresses(&self, method: &str) -> Result<Vec<WalletAddress>, ProviderError> {
        let value = self.transport.request(method, json!([])).await?;
        let accounts: Vec<String> =
            serde_json::from_value(value).map_err(|err| ProviderError::Decode(err.to_string()))?;
        Ok(accounts.into_iter().map(WalletAddress).collect())
    }
}

#[derive(Debug, Deserialize)]
struct ReceiptResponse {
    #[serde(rename = "transactionHash")]
    transaction_hash: String,
    status: Option<String>,
}

#[async_trait(?Send)]
impl<T: Transport> WalletProvider for Eip1193Provider<T> {
    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        self.addresses("eth_requestAccounts").await
    }

    async fn accounts(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        self.addresses("eth_accounts").await
    }

    async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        let value = self.transport.request("eth_chainId", json!([])).await?;
        value
            .as_str()
            .map(ChainId::new)
            .ok_or_else(|| ProviderError::Decode(format!("eth_chainId returned {value}")))
    }

    async fn switch_chain(&self, params: &SwitchChainParams) -> Result<(), ProviderError> {
        self.transport
            .request("wallet_switchEthereumChain", json!([params]))
            .await
            .map(|_| ())
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError> {
        self.transport
            .request("wallet_addEthereumChain", json!([params]))
            .await
            .map(|_| ())
    }
}

#[async_trait(?Send)]
impl<T: Transport> RegistryReader for Eip1193Provider<T> {
    async fn all_names(&self) -> Result<Vec<String>> {
        Ok(self.call(BunnyRegistry::getAllNamesCall {}).await?._0)
    }

    async fn record(&self, name: &str) -> Result<String> {
        let call = BunnyRegistry::recordsCall {
            name: name.to_owned(),
        };
        Ok(self.call(call).await?._0)
    }

    async fn owner(&self, name: &str) -> Result<WalletAddress> {
        let call = BunnyRegistry::domainsCall {
            name: name.to_owned(),
        };
        Ok(WalletAddress(self.call(call).await?._0.to_string()))
    }
}

#[async_trait(?Send)]
impl<T: Transport> RegistryContract for Eip1193Provider<T> {
    async fn register(&self, from: &WalletAddress, name: &str, value: U256) -> Result<PendingTx> {
        let call = BunnyRegistry::registerCall {
            name: name.to_owned(),
        };
        self.send(from, call, Some(value)).await
    }

    async fn set_record(&self, from: &WalletAddress, name: &str, record: &str) -> Result<PendingTx> {
        let call = BunnyRegistry::setRecordCall {
            name: name.to_owned(),
            record: record.to_owned(),
        };
        self.send(from, call, None).await
    }

    async fn wait_for_receipt(&self, tx: &PendingTx) -> Result<TxReceipt> {
        let interval = Duration::from_millis(self.polling.interval_ms);
        for _ in 0..self.polling.max_polls {
            let value = self
                .transport
                .request("eth_getTransactionReceipt", json!([tx.tx_hash]))
                .await?;
            if value.is_null() {
                self.transport.sleep(interval).await;
                continue;
            }
            let receipt: ReceiptResponse =
                serde_json::from_value(value).context("malformed transaction receipt")?;
            return Ok(TxReceipt {
                tx_hash: receipt.transaction_hash,
                success: receipt.status.as_deref() == Some("0x1"),
            });
        }
        bail!(
            "transaction {} not mined after {} polls",
            tx.tx_hash,
            self.polling.max_polls
        )
    }
}
