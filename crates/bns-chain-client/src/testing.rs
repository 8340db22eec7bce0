//! In-memory fakes for the wallet and registry seams.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use alloy_primitives::U256;
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use bns_api_types::{AddChainParams, ChainId, SwitchChainParams, WalletAddress};

use crate::{PendingTx, ProviderError, RegistryContract, RegistryReader, TxReceipt, WalletProvider};

#[derive(Default)]
pub struct FakeWallet {
    accounts: Vec<WalletAddress>,
    calls: RefCell<Vec<&'static str>>,
    switch_error: Cell<Option<i64>>,
    add_error: Cell<Option<i64>>,
    added: RefCell<Option<AddChainParams>>,
}

impl FakeWallet {
    pub fn with_accounts(accounts: &[&str]) -> Self {
        Self {
            accounts: accounts.iter().map(|a| WalletAddress((*a).to_owned())).collect(),
            ..Self::default()
        }
    }

    pub fn fail_switch_with(&self, code: i64) {
        self.switch_error.set(Some(code));
    }

    pub fn fail_add_with(&self, code: i64) {
        self.add_error.set(Some(code));
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    pub fn added_chain(&self) -> Option<AddChainParams> {
        self.added.borrow().clone()
    }

    fn rpc_error(code: i64) -> ProviderError {
        ProviderError::Rpc {
            code,
            message: "fake".to_owned(),
        }
    }
}

#[async_trait(?Send)]
impl WalletProvider for FakeWallet {
    async fn request_accounts(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        self.calls.borrow_mut().push("eth_requestAccounts");
        Ok(self.accounts.clone())
    }

    async fn accounts(&self) -> Result<Vec<WalletAddress>, ProviderError> {
        self.calls.borrow_mut().push("eth_accounts");
        Ok(self.accounts.clone())
    }

    async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        self.calls.borrow_mut().push("eth_chainId");
        Ok(ChainId::new("0x1"))
    }

    async fn switch_chain(&self, _params: &SwitchChainParams) -> Result<(), ProviderError> {
        self.calls.borrow_mut().push("wallet_switchEthereumChain");
        match self.switch_error.get() {
            Some(code) => Err(Self::rpc_error(code)),
            None => Ok(()),
        }
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError> {
        self.calls.borrow_mut().push("wallet_addEthereumChain");
        *self.added.borrow_mut() = Some(params.clone());
        match self.add_error.get() {
            Some(code) => Err(Self::rpc_error(code)),
            None => Ok(()),
        }
    }
}

/// Registry with contract-like rules: names are unique and only the owner
/// may set a record. Rule violations produce failed receipts.
#[derive(Default)]
pub struct FakeRegistry {
    names: RefCell<Vec<String>>,
    records: RefCell<HashMap<String, String>>,
    owners: RefCell<HashMap<String, WalletAddress>>,
    paid: RefCell<HashMap<String, U256>>,
    receipts: RefCell<HashMap<String, bool>>,
    sent: RefCell<Vec<String>>,
    fail_reads: Cell<bool>,
    fail_next_set_record: Cell<bool>,
}

impl FakeRegistry {
    pub fn seed(&self, name: &str, record: &str, owner: &str) {
        self.names.borrow_mut().push(name.to_owned());
        self.records.borrow_mut().insert(name.to_owned(), record.to_owned());
        self.owners
            .borrow_mut()
            .insert(name.to_owned(), WalletAddress(owner.to_owned()));
    }

    pub fn fail_reads(&self) {
        self.fail_reads.set(true);
    }

    pub fn fail_next_set_record(&self) {
        self.fail_next_set_record.set(true);
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }

    pub fn paid(&self, name: &str) -> Option<U256> {
        self.paid.borrow().get(name).copied()
    }

    fn issue(&self, label: String, success: bool) -> PendingTx {
        let tx_hash = format!("0x{:064x}", self.sent.borrow().len() + 1);
        self.sent.borrow_mut().push(label);
        self.receipts.borrow_mut().insert(tx_hash.clone(), success);
        PendingTx { tx_hash }
    }
}

#[async_trait(?Send)]
impl RegistryReader for FakeRegistry {
    async fn all_names(&self) -> Result<Vec<String>> {
        Ok(self.names.borrow().clone())
    }

    async fn record(&self, name: &str) -> Result<String> {
        if self.fail_reads.get() {
            bail!("records({name}) reverted");
        }
        Ok(self.records.borrow().get(name).cloned().unwrap_or_default())
    }

    async fn owner(&self, name: &str) -> Result<WalletAddress> {
        self.owners
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("no owner for {name}"))
    }
}

#[async_trait(?Send)]
impl RegistryContract for FakeRegistry {
    async fn register(&self, from: &WalletAddress, name: &str, value: U256) -> Result<PendingTx> {
        let taken = self.owners.borrow().contains_key(name);
        if !taken {
            self.names.borrow_mut().push(name.to_owned());
            self.owners.borrow_mut().insert(name.to_owned(), from.clone());
            self.paid.borrow_mut().insert(name.to_owned(), value);
        }
        Ok(self.issue(format!("register:{name}"), !taken))
    }

    async fn set_record(&self, from: &WalletAddress, name: &str, record: &str) -> Result<PendingTx> {
        if self.fail_next_set_record.replace(false) {
            self.sent.borrow_mut().push(format!("setRecord:{name}"));
            bail!("user rejected setRecord");
        }
        let owned = self
            .owners
            .borrow()
            .get(name)
            .is_some_and(|owner| owner.matches(&from.0));
        if owned {
            self.records.borrow_mut().insert(name.to_owned(), record.to_owned());
        }
        Ok(self.issue(format!("setRecord:{name}"), owned))
    }

    async fn wait_for_receipt(&self, tx: &PendingTx) -> Result<TxReceipt> {
        let success = self
            .receipts
            .borrow()
            .get(&tx.tx_hash)
            .copied()
            .ok_or_else(|| anyhow!("unknown transaction {}", tx.tx_hash))?;
        Ok(TxReceipt {
            tx_hash: tx.tx_hash.clone(),
            success,
        })
    }
}
