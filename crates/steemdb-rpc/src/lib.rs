//! steemdb-rpc
//!
//! Typed client for a node's `database_api` namespace.
//!
//! Layers:
//!   transport: the `Transport` capability (`invoke(namespace, method, params)`)
//!   call     : typed calls, argument validation and positional param encoding
//!   database : `DatabaseApi`, one async method per remote method
//!   http / ws: bundled transports speaking the node's JSON-RPC `call` envelope

pub mod call;
pub mod database;
pub mod http;
pub mod transport;
pub mod ws;

pub use call::DatabaseCall;
pub use database::DatabaseApi;
pub use http::HttpTransport;
pub use transport::{Transport, TransportConfig};
pub use ws::WsTransport;

use steemdb_core::error::ClientResult;

/// Open the transport matching the URL scheme in `config`.
pub async fn connect(config: &TransportConfig) -> ClientResult<Box<dyn Transport>> {
    if config.is_websocket() {
        Ok(Box::new(WsTransport::connect(config).await?))
    } else {
        Ok(Box::new(HttpTransport::new(config)?))
    }
}
