//! Application State
//!
//! HTTP 传输共享的状态

use std::sync::Arc;

use crate::infrastructure::mcp::McpHandler;

/// 应用状态
pub struct AppState {
    pub mcp: Arc<McpHandler>,
}

impl AppState {
    pub fn new(mcp: Arc<McpHandler>) -> Self {
        Self { mcp }
    }
}
