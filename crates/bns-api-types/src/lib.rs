use serde::{Deserialize, Serialize};
use std::fmt;

pub const TLD: &str = ".bunny";
pub const REGISTRY_CONTRACT: &str = "0x3105DA132E1D844A50253d31d60E24608c9aED61";
pub const MUMBAI_CHAIN_ID: &str = "0x13881";
pub const MUMBAI_LABEL: &str = "Polygon Mumbai Testnet";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    /// Address comparison as wallets report them: checksummed or lowercase.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }

    /// `0x1234...abcd` form used in the header.
    pub fn short(&self) -> String {
        let s = &self.0;
        if s.len() <= 10 || !s.is_ascii() {
            return s.clone();
        }
        format!("{}...{}", &s[..6], &s[s.len() - 4..])
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex chain id as reported by `eth_chainId` (e.g. `0x13881`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChainId(pub String);

impl ChainId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Lowercased hex with leading zeros stripped, so `0x013881` and
    /// `0x13881` compare equal.
    pub fn normalized(&self) -> String {
        let raw = self.0.trim();
        let digits = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .unwrap_or(raw)
            .trim_start_matches('0')
            .to_ascii_lowercase();
        if digits.is_empty() {
            "0x0".to_owned()
        } else {
            format!("0x{digits}")
        }
    }

    pub fn same_chain(&self, other: &ChainId) -> bool {
        self.normalized() == other.normalized()
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One registered name as read from the registry contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NameRecord {
    /// Position in `getAllNames()`; doubles as the NFT token id.
    pub id: usize,
    pub name: String,
    pub record: String,
    pub owner: WalletAddress,
}

impl NameRecord {
    pub fn display_name(&self) -> String {
        format!("{}{}", self.name, TLD)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Parameters of `wallet_addEthereumChain`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: ChainId,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    pub block_explorer_urls: Vec<String>,
}

/// Parameters of `wallet_switchEthereumChain`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SwitchChainParams {
    pub chain_id: ChainId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkEntry {
    pub chain_id: ChainId,
    pub label: String,
}

/// Chain-id to human-readable network name lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkTable {
    pub entries: Vec<NetworkEntry>,
}

impl NetworkTable {
    pub fn label(&self, chain_id: &ChainId) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.chain_id.same_chain(chain_id))
            .map(|entry| entry.label.as_str())
    }
}

impl Default for NetworkTable {
    fn default() -> Self {
        let entries = [
            ("0x1", "Mainnet"),
            ("0x3", "Ropsten"),
            ("0x2a", "Kovan"),
            ("0x4", "Rinkeby"),
            ("0x5", "Goerli"),
            ("0x61", "BSC Testnet"),
            ("0x38", "BSC Mainnet"),
            ("0x89", "Polygon Mainnet"),
            (MUMBAI_CHAIN_ID, MUMBAI_LABEL),
            ("0xa86a", "AVAX Mainnet"),
        ]
        .into_iter()
        .map(|(id, label)| NetworkEntry {
            chain_id: ChainId::new(id),
            label: label.to_owned(),
        })
        .collect();
        Self { entries }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceiptPolling {
    pub interval_ms: u64,
    pub max_polls: u32,
}

impl Default for ReceiptPolling {
    fn default() -> Self {
        Self {
            interval_ms: 1_000,
            max_polls: 120,
        }
    }
}

/// Everything the front end bakes in at build time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub contract_address: String,
    pub tld: String,
    pub target_network: AddChainParams,
    pub networks: NetworkTable,
    pub pricing_version: u32,
    pub refetch_delay_ms: u64,
    pub receipt_polling: ReceiptPolling,
    pub marketplace_url: String,
    pub explorer_tx_url: String,
    pub install_wallet_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            contract_address: REGISTRY_CONTRACT.to_owned(),
            tld: TLD.to_owned(),
            target_network: AddChainParams {
                chain_id: ChainId::new(MUMBAI_CHAIN_ID),
                chain_name: MUMBAI_LABEL.to_owned(),
                rpc_urls: vec!["https://rpc-mumbai.maticvigil.com/".to_owned()],
                native_currency: NativeCurrency {
                    name: "Mumbai Matic".to_owned(),
                    symbol: "MATIC".to_owned(),
                    decimals: 18,
                },
                block_explorer_urls: vec!["https://mumbai.polygonscan.com/".to_owned()],
            },
            networks: NetworkTable::default(),
            pricing_version: 1,
            refetch_delay_ms: 2_000,
            receipt_polling: ReceiptPolling::default(),
            marketplace_url: "https://testnets.opensea.io/assets/mumbai".to_owned(),
            explorer_tx_url: "https://mumbai.polygonscan.com/tx".to_owned(),
            install_wallet_url: "https://metamask.io/".to_owned(),
        }
    }
}

impl AppConfig {
    /// Label of the network the form requires.
    pub fn required_network(&self) -> &str {
        &self.target_network.chain_name
    }

    pub fn marketplace_link(&self, record: &NameRecord) -> String {
        format!(
            "{}/{}/{}",
            self.marketplace_url.trim_end_matches('/'),
            self.contract_address,
            record.id
        )
    }

    pub fn explorer_tx_link(&self, tx_hash: &str) -> String {
        format!("{}/{}", self.explorer_tx_url.trim_end_matches('/'), tx_hash)
    }
}
