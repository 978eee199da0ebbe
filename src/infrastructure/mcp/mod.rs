//! MCP Layer - Model Context Protocol 服务端
//!
//! JSON-RPC 2.0 方法: initialize / ping / tools/list / tools/call

mod handler;
pub mod protocol;
mod stdio;

pub use handler::McpHandler;
pub use protocol::{CallToolResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use stdio::{serve, serve_stdio};
