//! Derived view models for the header, the name list and the form.

use bns_api_types::AppConfig;
use serde::Serialize;

use crate::ViewState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Logo {
    Polygon,
    Ethereum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub wallet: String,
    pub logo: Logo,
}

pub fn header(state: &ViewState) -> Header {
    let wallet = match &state.account {
        Some(account) => format!("Wallet: {}", account.short()),
        None => "Not Connected".to_owned(),
    };
    let logo = match &state.network {
        Some(label) if label.contains("Polygon") => Logo::Polygon,
        _ => Logo::Ethereum,
    };
    Header { wallet, logo }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCard {
    pub id: usize,
    pub name: String,
    pub display_name: String,
    pub record: String,
    pub link: String,
    pub editable: bool,
}

/// Cards for the list view. Empty until an account is connected.
pub fn name_cards(state: &ViewState, config: &AppConfig) -> Vec<NameCard> {
    let Some(account) = &state.account else {
        return Vec::new();
    };
    state
        .names
        .iter()
        .map(|name| NameCard {
            id: name.id,
            name: name.name.clone(),
            display_name: format!("{}{}", name.name, config.tld),
            record: name.record.clone(),
            link: config.marketplace_link(name),
            editable: account.matches(&name.owner.0),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FormView {
    NotConnected,
    WrongNetwork { required: String },
    Mint { busy: bool },
    Edit { domain: String, busy: bool },
}

pub fn form_view(state: &ViewState) -> FormView {
    if state.account.is_none() {
        return FormView::NotConnected;
    }
    if !state.on_required_network() {
        return FormView::WrongNetwork {
            required: state.required_network.clone(),
        };
    }
    let busy = state.form.loading;
    if state.form.editing {
        FormView::Edit {
            domain: state.form.domain.clone(),
            busy,
        }
    } else {
        FormView::Mint { busy }
    }
}

/// Names are refetched whenever account or network changes while on the
/// required network.
pub fn needs_refetch(prev: &ViewState, next: &ViewState) -> bool {
    let changed = prev.account != next.account || prev.network != next.network;
    changed && next.on_required_network()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, reduce};
    use bns_api_types::{ChainId, MUMBAI_LABEL, NameRecord, WalletAddress};

    const ME: &str = "0xAbCdEf0000000000000000000000000000000001";

    fn record(id: usize, name: &str, owner: &str) -> NameRecord {
        NameRecord {
            id,
            name: name.to_owned(),
            record: format!("{name} record"),
            owner: WalletAddress(owner.to_owned()),
        }
    }

    fn state(account: Option<&str>, network: Option<&str>) -> ViewState {
        let mut state = ViewState::new(MUMBAI_LABEL);
        state.account = account.map(|a| WalletAddress(a.to_owned()));
        state.network = network.map(str::to_owned);
        state.chain_id = Some(ChainId::new("0x13881"));
        state
    }

    #[test]
    fn edit_affordance_only_for_owner() {
        let mut state = state(Some(ME), Some(MUMBAI_LABEL));
        state.names = vec![
            record(0, "mine", &ME.to_ascii_lowercase()),
            record(1, "theirs", "0x0000000000000000000000000000000000000002"),
            record(2, "alsomine", &ME.to_ascii_uppercase().replace("0X", "0x")),
        ];
        let cards = name_cards(&state, &AppConfig::default());
        let editable: Vec<bool> = cards.iter().map(|c| c.editable).collect();
        assert_eq!(editable, vec![true, false, true]);
        assert_eq!(cards[0].display_name, "mine.bunny");
        assert!(cards[1].link.ends_with("/1"));
    }

    #[test]
    fn no_cards_without_account() {
        let mut state = state(None, Some(MUMBAI_LABEL));
        state.names = vec![record(0, "mine", ME)];
        assert!(name_cards(&state, &AppConfig::default()).is_empty());
    }

    #[test]
    fn form_modes() {
        assert_eq!(form_view(&state(None, None)), FormView::NotConnected);
        assert_eq!(
            form_view(&state(Some(ME), Some("Mainnet"))),
            FormView::WrongNetwork {
                required: MUMBAI_LABEL.to_owned()
            }
        );
        let ready = state(Some(ME), Some(MUMBAI_LABEL));
        assert_eq!(form_view(&ready), FormView::Mint { busy: false });

        let editing = reduce(ready, Action::EditRequested("carrot".to_owned()));
        let editing = reduce(editing, Action::SubmitStarted);
        assert_eq!(
            form_view(&editing),
            FormView::Edit {
                domain: "carrot".to_owned(),
                busy: true
            }
        );
    }

    #[test]
    fn header_shows_short_wallet_and_logo() {
        let connected = header(&state(
            Some("0x1234567890abcdef1234567890abcdef12345678"),
            Some(MUMBAI_LABEL),
        ));
        assert_eq!(connected.wallet, "Wallet: 0x1234...5678");
        assert_eq!(connected.logo, Logo::Polygon);

        let anonymous = header(&state(None, Some("Mainnet")));
        assert_eq!(anonymous.wallet, "Not Connected");
        assert_eq!(anonymous.logo, Logo::Ethereum);
    }

    #[test]
    fn refetch_on_account_or_network_change() {
        let empty = state(None, None);
        let connected = state(Some(ME), Some(MUMBAI_LABEL));
        assert!(needs_refetch(&empty, &connected));
        assert!(!needs_refetch(&connected, &connected.clone()));

        let wrong = state(Some(ME), Some("Mainnet"));
        assert!(!needs_refetch(&empty, &wrong));
    }
}
