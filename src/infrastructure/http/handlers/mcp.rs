//! MCP Handler
//!
//! 一次 POST 承载一条 JSON-RPC 消息

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::infrastructure::http::state::AppState;

/// POST /mcp
///
/// 通知返回 202 且无响应体
pub async fn mcp(State(state): State<Arc<AppState>>, body: String) -> Response {
    match state.mcp.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
