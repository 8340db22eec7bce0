//! Wallet and registry operations.
//!
//! Each handler reads the current [`ViewState`](bns_view_state::ViewState),
//! talks to the injected wallet and dispatches the outcome through [`apply`],
//! which re-renders and runs the follow-up effects the new state asks for.

use bns_api_types::{AppConfig, ChainId, WalletAddress};
use bns_chain_client::{MintError, NetworkGuard, RegistryClient, WalletConnector, WalletError};
use bns_pricing::PricingPolicy;
use bns_view_state::{Action, Notice, needs_refetch};
use gloo_timers::future::TimeoutFuture;
use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::dom::{self, Elements};
use crate::provider::{self, InjectedProvider, InjectedTransport};
use crate::render;
use crate::state;

/// Reduce, re-render, then run effects: alert pending notices, reload on
/// chain change and refetch names when identity or network moved.
pub fn apply(els: &Elements, action: Action) {
    let (prev, next) = state::dispatch(action);
    let config = state::config();
    render::render(els, &next, &config);

    if next.reload_requested {
        dom::reload();
        return;
    }
    if let Some(notice) = &next.notice {
        dom::alert(&notice.message());
        state::dispatch(Action::NoticeShown);
    }
    if needs_refetch(&prev, &next) {
        let els = els.clone();
        wasm_bindgen_futures::spawn_local(async move {
            fetch_names(&els).await;
        });
    }
}

fn provider(config: &AppConfig) -> Option<InjectedProvider> {
    match provider::injected(config) {
        Ok(provider) => provider,
        Err(err) => {
            warn!("wallet provider unavailable: {:#}", err);
            None
        }
    }
}

fn registry(config: &AppConfig) -> Option<RegistryClient<InjectedProvider>> {
    let pricing = PricingPolicy::for_version(config.pricing_version).unwrap_or_default();
    provider(config).map(|p| {
        RegistryClient::new(p, pricing).with_explorer(config.explorer_tx_url.clone())
    })
}

/// Silent startup check: picks up an already-authorized account and the
/// current network, then listens for chain changes.
pub async fn check_connection(els: &Elements) {
    let config = state::config();
    let connector = WalletConnector::new(provider(&config));
    let snapshot = match connector.check_connection().await {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => return,
        Err(err) => {
            warn!("connection check failed: {}", err);
            return;
        }
    };

    let guard = NetworkGuard::from_config(&config);
    let network = guard.label(&snapshot.chain_id).map(str::to_owned);
    apply(
        els,
        Action::ConnectionChecked {
            account: snapshot.account,
            chain_id: snapshot.chain_id,
            network,
        },
    );

    if let Some(transport) = InjectedTransport::detect() {
        subscribe_chain_changed(els, &transport);
    }
}

fn subscribe_chain_changed(els: &Elements, transport: &InjectedTransport) {
    let els = els.clone();
    let handler = Closure::wrap(Box::new(move |chain: JsValue| {
        let chain_id = chain.as_string().unwrap_or_default();
        apply(&els, Action::ChainChanged(ChainId::new(chain_id)));
    }) as Box<dyn FnMut(JsValue)>);
    if let Err(err) = transport.on("chainChanged", &handler) {
        warn!("could not subscribe to chainChanged: {}", err);
    }
    handler.forget();
}

pub async fn on_connect(els: &Elements) {
    let config = state::config();
    let connector = WalletConnector::new(provider(&config));
    match connector.connect().await {
        Ok(account) => apply(els, Action::AccountConnected(account)),
        Err(WalletError::ProviderMissing) => apply(
            els,
            Action::Notify(Notice::InstallWallet {
                url: config.install_wallet_url.clone(),
            }),
        ),
        Err(err) => warn!("connect failed: {}", err),
    }
}

pub async fn on_switch_network(els: &Elements) {
    let config = state::config();
    let Some(provider) = provider(&config) else {
        apply(
            els,
            Action::Notify(Notice::WalletMissingForSwitch {
                url: config.install_wallet_url.clone(),
            }),
        );
        return;
    };
    // Failures are logged by the guard; success surfaces as chainChanged.
    NetworkGuard::from_config(&config)
        .switch_network(&provider)
        .await;
}

/// Replace the list with a fresh enumeration of the registry.
pub async fn fetch_names(els: &Elements) {
    let config = state::config();
    let Some(client) = registry(&config) else {
        return;
    };
    match client.fetch_all().await {
        Ok(names) => apply(els, Action::NamesLoaded(names)),
        Err(err) => warn!("could not fetch names: {:#}", err),
    }
}

fn account() -> Option<WalletAddress> {
    state::with(|s| s.account.clone())
}

pub async fn on_mint(els: &Elements) {
    let (domain, record) = state::with(|s| (s.form.domain.clone(), s.form.record.clone()));
    if domain.is_empty() {
        return;
    }
    let config = state::config();
    let (Some(from), Some(client)) = (account(), registry(&config)) else {
        return;
    };

    apply(els, Action::SubmitStarted);
    match client.mint(&from, &domain, &record).await {
        Ok(saga) => {
            apply(els, Action::MintCompleted(saga));
            schedule_refetch(els, config.refetch_delay_ms);
        }
        Err(err) => mint_failed(els, err),
    }
}

/// Finish the record step of a mint that was interrupted.
pub async fn on_retry_record(els: &Elements) {
    let Some(saga) = state::with(|s| s.pending_mint.clone()) else {
        return;
    };
    let config = state::config();
    let (Some(from), Some(client)) = (account(), registry(&config)) else {
        return;
    };

    apply(els, Action::SubmitStarted);
    match client.resume(&from, saga).await {
        Ok(saga) => {
            apply(els, Action::MintCompleted(saga));
            schedule_refetch(els, config.refetch_delay_ms);
        }
        Err(err) => mint_failed(els, err),
    }
}

fn mint_failed(els: &Elements, err: MintError) {
    let action = bns_view_state::mint_failed(&err);
    match &action {
        Action::SubmitFailed => warn!("mint failed: {:#}", anyhow::Error::from(err)),
        // The name is already on chain; show it while the record is pending.
        Action::MintInterrupted(_) => schedule_refetch(els, state::config().refetch_delay_ms),
        _ => {}
    }
    apply(els, action);
}

fn schedule_refetch(els: &Elements, delay_ms: u64) {
    let els = els.clone();
    let delay = u32::try_from(delay_ms).unwrap_or(u32::MAX);
    wasm_bindgen_futures::spawn_local(async move {
        TimeoutFuture::new(delay).await;
        fetch_names(&els).await;
    });
}

pub async fn on_set_record(els: &Elements) {
    let (domain, record) = state::with(|s| (s.form.domain.clone(), s.form.record.clone()));
    if domain.is_empty() || record.is_empty() {
        return;
    }
    let config = state::config();
    let (Some(from), Some(client)) = (account(), registry(&config)) else {
        return;
    };

    apply(els, Action::SubmitStarted);
    match client.update_record(&from, &domain, &record).await {
        Ok(_) => {
            apply(els, Action::RecordUpdated);
            fetch_names(els).await;
        }
        Err(err) => {
            let action = bns_view_state::update_failed(&err);
            warn!("record update failed: {:#}", anyhow::Error::from(err));
            apply(els, action);
        }
    }
}
