//! Shared harness for client integration tests.
//!
//! Each test file builds its own mock of the analysis server as an
//! `axum::Router` and serves it on an ephemeral local port; the clients
//! under test talk to it over real HTTP.

// Each test binary compiles this module separately and uses a subset.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use serde_json::{json, Value};

use tetres_client::{ApiUrls, ClientConfig, HttpGateway};

/// A mock analysis server bound to an ephemeral port.
pub struct MockServer {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl MockServer {
    /// Serve the router on `127.0.0.1:0`.
    pub async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock server");
        });
        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    pub fn urls(&self) -> ApiUrls {
        ApiUrls::new(&self.base_url)
    }

    pub fn gateway(&self) -> Arc<HttpGateway> {
        let config = ClientConfig::for_server(&self.base_url);
        Arc::new(HttpGateway::new(&config).expect("gateway"))
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Success envelope with a payload.
pub fn success(obj: Value) -> Value {
    json!({"code": 1, "message": "OK", "obj": obj})
}

/// Success envelope without a payload.
pub fn success_empty() -> Value {
    json!({"code": 1, "message": "OK"})
}

/// Domain-failure envelope (e.g. "process is running").
pub fn fail(message: &str) -> Value {
    json!({"code": 0, "message": message})
}

/// Invalid-request envelope.
pub fn error(message: &str) -> Value {
    json!({"code": -1, "message": message})
}
