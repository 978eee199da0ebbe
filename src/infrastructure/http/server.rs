//! HTTP Server
//!
//! MCP over HTTP: 每次 POST /mcp 承载一条 JSON-RPC 消息，传输层不保存会话状态

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use http::header::{HeaderName, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;
use crate::config::ServerConfig;

/// 单条 JSON-RPC 消息的请求体上限，合成文本本身不超过几 KB
const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// 浏览器端 MCP 客户端会带上协议版本头
const MCP_PROTOCOL_VERSION_HEADER: &str = "mcp-protocol-version";

/// MCP HTTP 传输
pub struct HttpServer {
    addr: String,
    state: Arc<AppState>,
}

impl HttpServer {
    pub fn new(config: &ServerConfig, state: AppState) -> Self {
        Self {
            addr: format!("{}:{}", config.host, config.port),
            state: Arc::new(state),
        }
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(&self.addr).await?;
        info!(addr = %listener.local_addr()?, "MCP HTTP transport listening on POST /mcp");

        axum::serve(listener, build_router(self.state))
            .with_graceful_shutdown(shutdown_signal)
            .await
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            ACCEPT,
            HeaderName::from_static(MCP_PROTOCOL_VERSION_HEADER),
        ])
        .max_age(Duration::from_secs(3600));

    create_routes()
        .layer(DefaultBodyLimit::max(MAX_MESSAGE_BYTES))
        .layer(middleware::from_fn(error_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::SpeechOptions;
    use crate::application::dispatch::ToolDispatcher;
    use crate::infrastructure::adapters::{
        FakeSpeechClient, FileAudioStorage, HttpDeviceClient, HttpDeviceClientConfig,
    };
    use crate::infrastructure::mcp::McpHandler;
    use crate::infrastructure::persistence::JsonProfileStore;
    use axum::body::Body;
    use http::{Method, Request, StatusCode};
    use tempfile::{tempdir, TempDir};
    use tower::util::ServiceExt;

    async fn router() -> (Router, TempDir) {
        let dir = tempdir().unwrap();
        let store = JsonProfileStore::open(dir.path().join("profiles.json")).await.unwrap();
        let device = HttpDeviceClient::new(HttpDeviceClientConfig::default()).unwrap();
        let dispatcher = ToolDispatcher::new(
            Arc::new(FakeSpeechClient::with_defaults()),
            Arc::new(device),
            Arc::new(store),
            SpeechOptions::default(),
        );
        let storage = FileAudioStorage::new(dir.path().join("audio")).await.unwrap();
        let mcp = McpHandler::new(Arc::new(dispatcher), Arc::new(storage));

        (build_router(Arc::new(AppState::new(Arc::new(mcp)))), dir)
    }

    #[tokio::test]
    async fn test_oversized_message_is_rejected() {
        let (router, _dir) = router().await;
        let body = format!(
            r#"{{"jsonrpc":"2.0","id":1,"method":"ping","params":{{"pad":"{}"}}}}"#,
            "x".repeat(MAX_MESSAGE_BYTES)
        );

        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/mcp")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_preflight_allows_mcp_protocol_header() {
        let (router, _dir) = router().await;

        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/mcp")
                    .header("origin", "http://localhost:3000")
                    .header("access-control-request-method", "POST")
                    .header("access-control-request-headers", MCP_PROTOCOL_VERSION_HEADER)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_success());
        let allowed = response
            .headers()
            .get("access-control-allow-headers")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        assert!(allowed.contains(MCP_PROTOCOL_VERSION_HEADER));
    }
}
