//! Tool Dispatch - 工具名到 handler 的路由与结果归一

mod catalog;
mod dispatcher;
mod request;
mod result;

pub use catalog::{describe, tool_catalog, ToolDescriptor};
pub use dispatcher::ToolDispatcher;
pub use request::*;
pub use result::{ToolFailure, ToolPayload, ToolResult};
