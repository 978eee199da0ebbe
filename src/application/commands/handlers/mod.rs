//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod device_handlers;
mod profile_handlers;
mod speech_handlers;

pub use device_handlers::*;
pub use profile_handlers::*;
pub use speech_handlers::*;
