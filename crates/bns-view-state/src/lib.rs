//! Front-end view state.
//!
//! All UI state lives in one serializable [`ViewState`] and changes only
//! through [`reduce`]. The browser layer dispatches actions and performs the
//! side effects the resulting state asks for.

use bns_api_types::{ChainId, NameRecord, WalletAddress};
use bns_chain_client::MintSaga;
use serde::{Deserialize, Serialize};

pub mod outcome;
pub mod view;

pub use outcome::{mint_failed, update_failed};
pub use view::{FormView, Header, Logo, NameCard, form_view, header, name_cards, needs_refetch};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub domain: String,
    pub record: String,
    /// Edit an owned name instead of minting a new one.
    pub editing: bool,
    pub loading: bool,
}

/// User-facing alerts. Everything else is only logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    InstallWallet { url: String },
    WalletMissingForSwitch { url: String },
    DomainTooShort { min: usize },
    TransactionFailed,
    RecordNotSet { domain: String },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Self::InstallWallet { url } => format!("Get MetaMask -> {url}"),
            Self::WalletMissingForSwitch { url } => {
                format!("Metamask is not installed. Please install it to use this app {url}")
            }
            Self::DomainTooShort { min } => format!("Domain must be at least {min} characters long"),
            Self::TransactionFailed => "Transaction failed! Please try again".to_owned(),
            Self::RecordNotSet { domain } => {
                format!("{domain} was minted but its record was not saved. Use Retry Record to finish.")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Network label the form requires.
    pub required_network: String,
    pub account: Option<WalletAddress>,
    pub chain_id: Option<ChainId>,
    pub network: Option<String>,
    pub form: FormState,
    pub names: Vec<NameRecord>,
    /// Mint whose record step failed; kept until resumed.
    pub pending_mint: Option<MintSaga>,
    pub notice: Option<Notice>,
    /// Set on chain change; the page must be reloaded.
    pub reload_requested: bool,
}

impl ViewState {
    pub fn new(required_network: impl Into<String>) -> Self {
        Self {
            required_network: required_network.into(),
            account: None,
            chain_id: None,
            network: None,
            form: FormState::default(),
            names: Vec::new(),
            pending_mint: None,
            notice: None,
            reload_requested: false,
        }
    }

    pub fn on_required_network(&self) -> bool {
        self.network.as_deref() == Some(self.required_network.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    ConnectionChecked {
        account: Option<WalletAddress>,
        chain_id: ChainId,
        network: Option<String>,
    },
    AccountConnected(WalletAddress),
    ChainChanged(ChainId),
    DomainChanged(String),
    RecordChanged(String),
    EditRequested(String),
    EditCancelled,
    SubmitStarted,
    /// Submission ended without a result worth showing; already logged.
    SubmitFailed,
    MintCompleted(MintSaga),
    MintInterrupted(MintSaga),
    RecordUpdated,
    NamesLoaded(Vec<NameRecord>),
    Notify(Notice),
    NoticeShown,
}

pub fn reduce(mut state: ViewState, action: Action) -> ViewState {
    match action {
        Action::ConnectionChecked {
            account,
            chain_id,
            network,
        } => {
            if account.is_some() {
                state.account = account;
            }
            state.chain_id = Some(chain_id);
            state.network = network;
        }
        Action::AccountConnected(account) => state.account = Some(account),
        // Full reload instead of patching account/network in place.
        Action::ChainChanged(_) => state.reload_requested = true,
        Action::DomainChanged(domain) => state.form.domain = domain,
        Action::RecordChanged(record) => state.form.record = record,
        Action::EditRequested(name) => {
            state.form.editing = true;
            state.form.domain = name;
        }
        Action::EditCancelled => state.form.editing = false,
        Action::SubmitStarted => state.form.loading = true,
        Action::SubmitFailed => state.form.loading = false,
        Action::MintCompleted(_) => {
            state.form = FormState::default();
            state.pending_mint = None;
        }
        Action::MintInterrupted(saga) => {
            state.form.loading = false;
            state.notice = Some(Notice::RecordNotSet {
                domain: saga.domain.clone(),
            });
            state.pending_mint = Some(saga);
        }
        Action::RecordUpdated => state.form = FormState::default(),
        Action::NamesLoaded(names) => state.names = names,
        Action::Notify(notice) => {
            state.form.loading = false;
            state.notice = Some(notice);
        }
        Action::NoticeShown => state.notice = None,
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use bns_api_types::MUMBAI_LABEL;
    use bns_chain_client::MintPhase;

    fn connected() -> ViewState {
        let state = ViewState::new(MUMBAI_LABEL);
        reduce(
            state,
            Action::ConnectionChecked {
                account: Some(WalletAddress("0xabc".to_owned())),
                chain_id: ChainId::new("0x13881"),
                network: Some(MUMBAI_LABEL.to_owned()),
            },
        )
    }

    fn saga(phase: MintPhase) -> MintSaga {
        MintSaga {
            domain: "carrot".to_owned(),
            record: "crunchy".to_owned(),
            price_wei: U256::from(1u8),
            phase,
        }
    }

    #[test]
    fn connection_check_sets_network() {
        let state = connected();
        assert!(state.on_required_network());
        assert_eq!(state.account, Some(WalletAddress("0xabc".to_owned())));
    }

    #[test]
    fn chain_change_only_requests_reload() {
        let before = connected();
        let after = reduce(before.clone(), Action::ChainChanged(ChainId::new("0x1")));
        assert!(after.reload_requested);
        assert_eq!(after.chain_id, before.chain_id);
        assert_eq!(after.network, before.network);
        assert_eq!(after.account, before.account);
    }

    #[test]
    fn edit_then_cancel() {
        let state = reduce(connected(), Action::EditRequested("carrot".to_owned()));
        assert!(state.form.editing);
        assert_eq!(state.form.domain, "carrot");
        let state = reduce(state, Action::EditCancelled);
        assert!(!state.form.editing);
    }

    #[test]
    fn successful_submissions_reset_the_form() {
        let mut state = connected();
        for action in [
            Action::DomainChanged("carrot".to_owned()),
            Action::RecordChanged("crunchy".to_owned()),
            Action::SubmitStarted,
        ] {
            state = reduce(state, action);
        }
        assert!(state.form.loading);

        let minted = reduce(
            state.clone(),
            Action::MintCompleted(saga(MintPhase::Complete {
                register_tx: "0x1".to_owned(),
                record_tx: "0x2".to_owned(),
            })),
        );
        assert_eq!(minted.form, FormState::default());

        let mut editing = reduce(state, Action::EditRequested("carrot".to_owned()));
        editing = reduce(editing, Action::RecordUpdated);
        assert_eq!(editing.form, FormState::default());
    }

    #[test]
    fn interrupted_mint_is_kept_and_announced() {
        let state = reduce(connected(), Action::SubmitStarted);
        let interrupted = saga(MintPhase::Registered {
            register_tx: "0x1".to_owned(),
        });
        let state = reduce(state, Action::MintInterrupted(interrupted.clone()));
        assert!(!state.form.loading);
        assert_eq!(state.pending_mint, Some(interrupted));
        assert_eq!(
            state.notice,
            Some(Notice::RecordNotSet {
                domain: "carrot".to_owned()
            })
        );

        let state = reduce(state, Action::NoticeShown);
        assert!(state.notice.is_none());
        assert!(state.pending_mint.is_some());
    }

    #[test]
    fn record_is_kept_as_typed() {
        let state = reduce(connected(), Action::RecordChanged("  hop  ".to_owned()));
        assert_eq!(state.form.record, "  hop  ");
    }

    #[test]
    fn notices_stop_loading() {
        let state = reduce(connected(), Action::SubmitStarted);
        let state = reduce(state, Action::Notify(Notice::TransactionFailed));
        assert!(!state.form.loading);
        assert_eq!(
            state.notice.as_ref().map(Notice::message).as_deref(),
            Some("Transaction failed! Please try again")
        );
    }

    #[test]
    fn state_round_trips_through_json() {
        let state = reduce(connected(), Action::EditRequested("carrot".to_owned()));
        let json = serde_json::to_string(&state).unwrap();
        let back: ViewState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
