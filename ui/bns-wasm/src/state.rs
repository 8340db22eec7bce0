//! Global application state.
//!
//! Uses `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! The view state only changes through [`dispatch`].

use bns_api_types::AppConfig;
use bns_view_state::{Action, ViewState, reduce};
use std::cell::RefCell;

thread_local! {
    static CONFIG: AppConfig = AppConfig::default();
    static STATE: RefCell<ViewState> =
        RefCell::new(ViewState::new(AppConfig::default().required_network()));
}

pub fn config() -> AppConfig {
    CONFIG.with(Clone::clone)
}

/// Run a closure with shared read access to the state.
pub fn with<F, R>(f: F) -> R
where
    F: FnOnce(&ViewState) -> R,
{
    STATE.with(|s| f(&s.borrow()))
}

pub fn snapshot() -> ViewState {
    with(Clone::clone)
}

/// Apply an action. Returns the state before and after.
pub fn dispatch(action: Action) -> (ViewState, ViewState) {
    STATE.with(|s| {
        let prev = s.borrow().clone();
        let next = reduce(prev.clone(), action);
        *s.borrow_mut() = next.clone();
        (prev, next)
    })
}
