//! HTTP and WebSocket transports against a local JSON-RPC node.
//!
//! Starts an in-process server that answers the `call` envelope for a few
//! database methods, then drives the database API through both transports.
//!
//! Run with:
//!   cargo test -p steemdb-rpc --test transports

use std::net::SocketAddr;
use std::time::Duration;

use jsonrpsee::core::{async_trait, RpcResult};
use jsonrpsee::proc_macros::rpc;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::ErrorObject;
use serde_json::{json, Value};

use steemdb_core::{ClientError, ConfigValue};
use steemdb_rpc::{connect, DatabaseApi, HttpTransport, Transport, TransportConfig, WsTransport};

const HEAD_BLOCK: u64 = 10;
const TX_ID: &str = "0123456789abcdef0123456789abcdef01234567";

// ── Local node ────────────────────────────────────────────────────────────────

#[rpc(server)]
pub trait NodeApi {
    #[method(name = "call")]
    async fn call(&self, api: String, method: String, params: Vec<Value>) -> RpcResult<Value>;
}

fn rpc_err(code: i32, msg: impl Into<String>) -> ErrorObject<'static> {
    ErrorObject::owned(code, msg.into(), None::<()>)
}

struct LocalNode;

#[async_trait]
impl NodeApiServer for LocalNode {
    async fn call(&self, api: String, method: String, params: Vec<Value>) -> RpcResult<Value> {
        if api != "database_api" {
            return Err(rpc_err(-32601, format!("unknown api: {api}")));
        }
        match method.as_str() {
            "get_config" => Ok(json!({
                "IS_TEST_NET": true,
                "STEEM_BLOCK_INTERVAL": 3,
                "STEEM_ADDRESS_PREFIX": "TST"
            })),
            "get_block_header" => {
                let num = params.first().and_then(Value::as_u64).unwrap_or_default();
                if num > HEAD_BLOCK {
                    return Ok(Value::Null);
                }
                Ok(json!({
                    "previous": format!("{:08x}", num - 1),
                    "timestamp": "2016-03-24T16:05:00",
                    "witness": "initminer",
                    "transaction_merkle_root": "0000000000000000000000000000000000000000",
                    "extensions": []
                }))
            }
            "get_transaction" => Err(rpc_err(
                -32000,
                format!("Assert Exception: Unknown Transaction {}", params[0]),
            )),
            _ => Err(rpc_err(-32601, format!("method not found: {method}"))),
        }
    }
}

async fn start_node() -> (SocketAddr, ServerHandle) {
    let server = Server::builder()
        .build("127.0.0.1:0")
        .await
        .expect("bind local node");
    let addr = server.local_addr().expect("local addr");
    let handle = server.start(LocalNode.into_rpc());
    (addr, handle)
}

async fn exercise<T: Transport + ?Sized>(transport: &T) {
    let api = DatabaseApi::new(transport);

    let cfg = api.get_config().await.expect("get_config");
    assert_eq!(cfg["IS_TEST_NET"], ConfigValue::Bool(true));
    assert_eq!(cfg["STEEM_ADDRESS_PREFIX"], ConfigValue::String("TST".into()));

    let header = api
        .get_block_header(3)
        .await
        .expect("get_block_header")
        .expect("block 3 exists");
    assert_eq!(header.previous, "00000002");
    assert_eq!(
        api.get_block_header(HEAD_BLOCK as u32 + 1).await.unwrap(),
        None
    );

    let err = api.get_transaction(TX_ID).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)), "got {err:?}");

    let err = api.get_version().await.unwrap_err();
    assert!(
        matches!(err, ClientError::Remote { code: -32601, .. }),
        "got {err:?}"
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn http_transport_round_trip() {
    let (addr, handle) = start_node().await;
    let transport = HttpTransport::new(&TransportConfig::new(format!("http://{addr}"))).unwrap();
    exercise(&transport).await;
    handle.stop().unwrap();
}

#[tokio::test]
async fn ws_transport_round_trip() {
    let (addr, handle) = start_node().await;
    let transport = WsTransport::connect(&TransportConfig::new(format!("ws://{addr}")))
        .await
        .unwrap();
    assert!(transport.is_connected());
    exercise(&transport).await;
    handle.stop().unwrap();
}

#[tokio::test]
async fn connect_picks_transport_from_scheme() {
    let (addr, handle) = start_node().await;
    for url in [format!("http://{addr}"), format!("ws://{addr}")] {
        let transport = connect(&TransportConfig::new(url)).await.unwrap();
        exercise(transport.as_ref()).await;
    }
    handle.stop().unwrap();
}

#[tokio::test]
async fn unreachable_node_is_a_transport_error() {
    let config = TransportConfig {
        url: "http://127.0.0.1:1".into(),
        request_timeout: Duration::from_secs(2),
    };
    let transport = HttpTransport::new(&config).unwrap();
    let err = DatabaseApi::new(&transport)
        .get_dynamic_global_properties()
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "got {err:?}");
    assert!(err.is_retryable());
}
