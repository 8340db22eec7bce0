//! Injected wallet provider (`window.ethereum`).
//!
//! Wraps the EIP-1193 `request` function as a [`Transport`] so the shared
//! EVM binding can drive it.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use bns_api_types::AppConfig;
use bns_chain_client::ProviderError;
use bns_chain_evm::{Eip1193Provider, Transport};
use gloo_timers::future::TimeoutFuture;
use js_sys::{Function, Object, Promise, Reflect};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::dom;

#[derive(Clone)]
pub struct InjectedTransport {
    ethereum: Object,
}

impl InjectedTransport {
    /// `None` when no wallet extension injected a provider.
    pub fn detect() -> Option<Self> {
        let value = Reflect::get(&dom::window(), &JsValue::from_str("ethereum")).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
        value.dyn_into::<Object>().ok().map(|ethereum| Self { ethereum })
    }

    fn method(&self, name: &str) -> Result<Function, ProviderError> {
        Reflect::get(&self.ethereum, &JsValue::from_str(name))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| ProviderError::Transport(format!("provider has no {name}()")))
    }

    /// Subscribe to a provider event such as `chainChanged`.
    pub fn on(&self, event: &str, handler: &Closure<dyn FnMut(JsValue)>) -> Result<(), ProviderError> {
        self.method("on")?
            .call2(&self.ethereum, &JsValue::from_str(event), handler.as_ref())
            .map(|_| ())
            .map_err(provider_error)
    }
}

#[derive(Serialize)]
struct RequestArgs<'a> {
    method: &'a str,
    params: &'a Value,
}

/// Wallets reject with `{ code, message }`; anything else is a transport
/// failure.
fn provider_error(err: JsValue) -> ProviderError {
    let code = Reflect::get(&err, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64());
    let message = Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    match code {
        Some(code) => ProviderError::Rpc {
            code: code as i64,
            message,
        },
        None => ProviderError::Transport(message),
    }
}

#[async_trait(?Send)]
impl Transport for InjectedTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let args = RequestArgs {
            method,
            params: &params,
        }
        .serialize(&serializer)
        .map_err(|err| ProviderError::Decode(err.to_string()))?;

        let promise = self
            .method("request")?
            .call1(&self.ethereum, &args)
            .map_err(provider_error)?
            .dyn_into::<Promise>()
            .map_err(|_| ProviderError::Transport("request() did not return a promise".into()))?;

        let result = JsFuture::from(promise).await.map_err(provider_error)?;
        if result.is_undefined() || result.is_null() {
            return Ok(Value::Null);
        }
        serde_wasm_bindgen::from_value(result).map_err(|err| ProviderError::Decode(err.to_string()))
    }

    async fn sleep(&self, duration: Duration) {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis).await;
    }
}

pub type InjectedProvider = Eip1193Provider<InjectedTransport>;

/// Wallet and registry access through the injected wallet, if there is one.
pub fn injected(config: &AppConfig) -> Result<Option<InjectedProvider>> {
    let Some(transport) = InjectedTransport::detect() else {
        return Ok(None);
    };
    Eip1193Provider::new(transport, &config.contract_address, config.receipt_polling)
        .map(Some)
}
