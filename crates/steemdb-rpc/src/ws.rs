use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::{async_trait, ClientError as RpcClientError};
use jsonrpsee::rpc_params;
use jsonrpsee::ws_client::{WsClient, WsClientBuilder};
use serde_json::Value;
use tracing::{debug, warn};

use steemdb_core::error::{ClientError, ClientResult};

use crate::transport::{Transport, TransportConfig};

/// JSON-RPC 2.0 over a persistent WebSocket connection.
///
/// Requests are multiplexed over the single connection; the client is safe
/// to share between tasks.
pub struct WsTransport {
    client: WsClient,
}

impl WsTransport {
    pub async fn connect(config: &TransportConfig) -> ClientResult<Self> {
        let client = WsClientBuilder::default()
            .request_timeout(config.request_timeout)
            .connection_timeout(config.request_timeout)
            .build(&config.url)
            .await
            .map_err(|e| ClientError::Transport(format!("connecting to {}: {e}", config.url)))?;
        debug!(url = %config.url, "WebSocket transport connected");
        Ok(Self { client })
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn invoke(
        &self,
        namespace: &str,
        method: &str,
        params: Vec<Value>,
    ) -> ClientResult<Value> {
        debug!(namespace, method, "sending RPC request");
        self.client
            .request::<Value, _>("call", rpc_params![namespace, method, params])
            .await
            .map_err(|e| map_client_error(method, e))
    }
}

fn map_client_error(method: &str, err: RpcClientError) -> ClientError {
    match err {
        RpcClientError::Call(obj) => {
            warn!(method, code = obj.code(), message = obj.message(), "remote error");
            ClientError::Remote {
                code: obj.code() as i64,
                message: obj.message().to_string(),
                data: obj.data().and_then(|raw| serde_json::from_str(raw.get()).ok()),
            }
        }
        other => {
            warn!(method, error = %other, "RPC request failed");
            ClientError::Transport(other.to_string())
        }
    }
}
