//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现，以及 MCP 协议与传输

pub mod adapters;
pub mod http;
pub mod mcp;
pub mod persistence;

pub use adapters::{ElevenLabsClient, FakeSpeechClient, FileAudioStorage, HttpDeviceClient};
pub use mcp::McpHandler;
pub use persistence::JsonProfileStore;
