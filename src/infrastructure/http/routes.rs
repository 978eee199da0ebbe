//! HTTP Routes
//!
//! API Endpoints:
//! - /mcp       POST  JSON-RPC 消息（通知返回 202）
//! - /api/ping  GET   健康检查

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/mcp", post(handlers::mcp))
        .nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new().route("/ping", get(handlers::ping))
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
    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tempfile::{tempdir, TempDir};
    use tower::util::ServiceExt;

    async fn app() -> (Router, TempDir) {
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

        let router = create_routes().with_state(Arc::new(AppState::new(Arc::new(mcp))));
        (router, dir)
    }

    fn post_mcp(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/mcp")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ping() {
        let (app, _dir) = app().await;
        let request = Request::builder().uri("/api/ping").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["server"], "mcp-elevenlabs-mia");
    }

    #[tokio::test]
    async fn test_mcp_tools_list() {
        let (app, _dir) = app().await;
        let response = app
            .oneshot(post_mcp(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 11);
    }

    #[tokio::test]
    async fn test_mcp_notification_is_accepted() {
        let (app, _dir) = app().await;
        let response = app
            .oneshot(post_mcp(json!({"jsonrpc": "2.0", "method": "notifications/initialized"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_mcp_tool_failure_is_rendered_in_result() {
        let (app, _dir) = app().await;
        let response = app
            .oneshot(post_mcp(json!({
                "jsonrpc": "2.0",
                "id": 9,
                "method": "tools/call",
                "params": {"name": "elevenlabs_generate_speech", "arguments": {"text": "", "voice_id": "v"}}
            })))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["id"], 9);
        assert_eq!(body["result"]["isError"], true);
        assert!(body["result"]["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("[ValidationError]"));
    }
}
