//! What a failed submission does to the page.
//!
//! Only a too-short domain and a reverted register transaction reach the
//! user as alerts. Everything else ends the submission and is left to the
//! logs.

use bns_chain_client::{MintError, UpdateError};

use crate::{Action, Notice};

pub fn mint_failed(err: &MintError) -> Action {
    match err {
        MintError::DomainTooShort { min, .. } => Action::Notify(Notice::DomainTooShort { min: *min }),
        MintError::Rejected { .. } => Action::Notify(Notice::TransactionFailed),
        MintError::Interrupted { saga, .. } => Action::MintInterrupted((**saga).clone()),
        MintError::EmptyDomain | MintError::NoPriceTier { .. } | MintError::Transaction(_) => {
            Action::SubmitFailed
        }
    }
}

pub fn update_failed(_err: &UpdateError) -> Action {
    Action::SubmitFailed
}
