use std::sync::atomic::{AtomicU64, Ordering};

use jsonrpsee::core::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use steemdb_core::error::{ClientError, ClientResult};

use crate::transport::{call_params, Transport, TransportConfig};

/// JSON-RPC 2.0 over HTTP POST, one request per call.
pub struct HttpTransport {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("building HTTP client: {e}")))?;
        Ok(Self {
            url: config.url.clone(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn invoke(
        &self,
        namespace: &str,
        method: &str,
        params: Vec<Value>,
    ) -> ClientResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": call_params(namespace, method, params),
            "id": id
        });
        debug!(id, namespace, method, url = %self.url, "sending RPC request");

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(method, error = %e, "RPC request failed");
                ClientError::Transport(format!("connecting to node at {}: {e}", self.url))
            })?;

        let status = resp.status();
        let json: Value = resp.json().await.map_err(|e| {
            ClientError::Transport(format!("parsing RPC response (HTTP {status}): {e}"))
        })?;

        parse_response(method, json)
    }
}

/// Split a JSON-RPC response body into its result or a remote error.
fn parse_response(method: &str, mut json: Value) -> ClientResult<Value> {
    if let Some(err) = json.get_mut("error").filter(|e| !e.is_null()) {
        let code = err.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        warn!(method, code, %message, "remote error");
        return Err(ClientError::Remote {
            code,
            message,
            data: err.get_mut("data").map(Value::take),
        });
    }
    match json.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(ClientError::Transport(format!(
            "response to {method} has neither result nor error"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn result_member_is_returned() {
        let body = json!({ "jsonrpc": "2.0", "id": 1, "result": { "head_block_number": 3 } });
        assert_eq!(
            parse_response("get_config", body).unwrap(),
            json!({ "head_block_number": 3 })
        );
    }

    #[test]
    fn null_result_is_a_value() {
        let body = json!({ "jsonrpc": "2.0", "id": 1, "result": null });
        assert_eq!(parse_response("get_block", body).unwrap(), Value::Null);
    }

    #[test]
    fn error_member_becomes_remote_error() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32003, "message": "Unknown Transaction", "data": { "stack": [] } }
        });
        match parse_response("get_transaction", body) {
            Err(ClientError::Remote {
                code,
                message,
                data,
            }) => {
                assert_eq!(code, -32003);
                assert_eq!(message, "Unknown Transaction");
                assert_eq!(data, Some(json!({ "stack": [] })));
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[test]
    fn empty_envelope_is_a_transport_error() {
        let body = json!({ "jsonrpc": "2.0", "id": 1 });
        assert!(parse_response("get_config", body).unwrap_err().is_retryable());
    }
}
