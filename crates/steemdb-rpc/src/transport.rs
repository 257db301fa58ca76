use std::sync::Arc;
use std::time::Duration;

use jsonrpsee::core::async_trait;
use serde_json::Value;

use steemdb_core::error::ClientResult;

/// The single capability the database API depends on: dispatch `method` in
/// `namespace` with positional `params` and return the decoded result.
///
/// Implementations report connection-level failures as
/// [`ClientError::Transport`](steemdb_core::ClientError::Transport) and
/// explicit error responses as
/// [`ClientError::Remote`](steemdb_core::ClientError::Remote). Retry and
/// cancellation policy, if any, live here and not in the callers.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn invoke(
        &self,
        namespace: &str,
        method: &str,
        params: Vec<Value>,
    ) -> ClientResult<Value>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn invoke(
        &self,
        namespace: &str,
        method: &str,
        params: Vec<Value>,
    ) -> ClientResult<Value> {
        (**self).invoke(namespace, method, params).await
    }
}

/// Connection settings shared by the bundled transports.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Node endpoint. `http(s)://` selects HTTP, `ws(s)://` WebSocket.
    pub url: String,
    /// Upper bound on a single request, including connection setup.
    pub request_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            url: "https://api.steemit.com".into(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn is_websocket(&self) -> bool {
        self.url.starts_with("ws://") || self.url.starts_with("wss://")
    }
}

/// JSON-RPC 2.0 `call` envelope params: `[namespace, method, params]`.
pub(crate) fn call_params(namespace: &str, method: &str, params: Vec<Value>) -> Value {
    Value::Array(vec![
        Value::String(namespace.to_string()),
        Value::String(method.to_string()),
        Value::Array(params),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scheme_selects_transport_kind() {
        assert!(!TransportConfig::default().is_websocket());
        assert!(TransportConfig::new("wss://node.example").is_websocket());
        assert!(!TransportConfig::new("http://127.0.0.1:8090").is_websocket());
    }

    #[test]
    fn envelope_nests_method_params() {
        assert_eq!(
            call_params("database_api", "get_block", vec![json!(7)]),
            json!(["database_api", "get_block", [7]])
        );
    }
}
