//! Ping Handler
//!
//! 健康检查

use axum::Json;
use serde::Serialize;

use crate::infrastructure::mcp::protocol::SERVER_NAME;

/// Ping 响应
#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub server: &'static str,
    pub version: &'static str,
}

/// Ping endpoint - 健康检查
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok",
        server: SERVER_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}
