//! HTTP Handlers

mod mcp;
mod ping;

pub use mcp::*;
pub use ping::*;
