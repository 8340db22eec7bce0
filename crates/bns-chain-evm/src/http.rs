//! JSON-RPC over HTTP.
//!
//! Talks straight to a node, so it can read the registry but cannot sign:
//! wallet-only methods fail locally with an unsupported-method error.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bns_api_types::AppConfig;
use bns_chain_client::ProviderError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::Transport;

pub struct HttpTransport {
    endpoint: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl HttpTransport {
    /// Endpoint priority: argument, `BNS_RPC_URL`, then the target network's
    /// first RPC URL.
    pub fn new(endpoint: Option<String>) -> Self {
        let endpoint = endpoint
            .or_else(|| std::env::var("BNS_RPC_URL").ok())
            .or_else(|| AppConfig::default().target_network.rpc_urls.into_iter().next())
            .unwrap_or_default();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Methods only an injected wallet can serve.
const WALLET_METHODS: &[&str] = &[
    "eth_requestAccounts",
    "eth_sendTransaction",
    "wallet_switchEthereumChain",
    "wallet_addEthereumChain",
];

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

/// Split a JSON-RPC envelope into its result or its error.
pub fn decode_response(body: Value) -> Result<Value, ProviderError> {
    let response: RpcResponse =
        serde_json::from_value(body).map_err(|err| ProviderError::Decode(err.to_string()))?;
    match (response.error, response.result) {
        (Some(err), _) => Err(ProviderError::Rpc {
            code: err.code,
            message: err.message,
        }),
        (None, result) => Ok(result.unwrap_or(Value::Null)),
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        if WALLET_METHODS.contains(&method) {
            return Err(ProviderError::Rpc {
                code: ProviderError::UNSUPPORTED_METHOD,
                message: format!("{method} needs a wallet"),
            });
        }
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        debug!(method, endpoint = %self.endpoint, "json-rpc request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Transport(format!("HTTP {status}: {text}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| ProviderError::Decode(err.to_string()))?;
        decode_response(body)
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Eip1193Provider;
    use bns_chain_client::RegistryClient;
    use bns_pricing::PricingPolicy;
    use serde_json::json;

    #[test]
    fn explicit_endpoint_wins() {
        let transport = HttpTransport::new(Some("http://localhost:8545/".to_owned()));
        assert_eq!(transport.endpoint(), "http://localhost:8545");
    }

    #[tokio::test]
    async fn wallet_methods_are_unsupported() {
        // Nothing listens on the discard port; no request may leave.
        let transport = HttpTransport::new(Some("http://127.0.0.1:9".to_owned()));
        for method in WALLET_METHODS {
            let err = transport.request(method, json!([])).await.unwrap_err();
            assert_eq!(err.code(), Some(ProviderError::UNSUPPORTED_METHOD));
        }
    }

    #[tokio::test]
    async fn switching_over_http_fails_without_adding() {
        let config = AppConfig::default();
        let provider = Eip1193Provider::new(
            HttpTransport::new(Some("http://127.0.0.1:9".to_owned())),
            &config.contract_address,
            config.receipt_polling,
        )
        .unwrap();
        let outcome = bns_chain_client::NetworkGuard::from_config(&config)
            .switch_network(&provider)
            .await;
        assert!(matches!(
            outcome,
            bns_chain_client::SwitchOutcome::Failed(ref err)
                if err.code() == Some(ProviderError::UNSUPPORTED_METHOD)
        ));
    }

    #[test]
    fn decodes_result() {
        let body = json!({ "jsonrpc": "2.0", "id": 1, "result": "0x13881" });
        assert_eq!(decode_response(body).unwrap(), json!("0x13881"));
    }

    #[test]
    fn null_result_stays_null() {
        let body = json!({ "jsonrpc": "2.0", "id": 1, "result": null });
        assert!(decode_response(body).unwrap().is_null());
    }

    #[test]
    fn decodes_error_code() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32601, "message": "method not found" }
        });
        let err = decode_response(body).unwrap_err();
        assert_eq!(err.code(), Some(-32601));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            decode_response(json!("nope")),
            Err(ProviderError::Decode(_))
        ));
    }

    /// Reads the live registry when `BNS_TEST_RPC_URL` points at a node.
    #[tokio::test]
    async fn live_registry_fetch() -> anyhow::Result<()> {
        let endpoint = match std::env::var("BNS_TEST_RPC_URL") {
            Ok(value) if !value.trim().is_empty() => value,
            _ => return Ok(()),
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let config = AppConfig::default();
        let provider = Eip1193Provider::new(
            HttpTransport::new(Some(endpoint)),
            &config.contract_address,
            config.receipt_polling,
        )?;
        let client = RegistryClient::new(provider, PricingPolicy::v1());
        let names = client.fetch_all().await?;
        for (index, name) in names.iter().enumerate() {
            assert_eq!(name.id, index);
        }
        Ok(())
    }
}
