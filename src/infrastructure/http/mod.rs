//! HTTP Layer - MCP over HTTP
//!
//! stdio 之外的可选传输

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use routes::create_routes;
pub use server::HttpServer;
pub use state::AppState;
