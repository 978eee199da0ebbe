//! 应用层 - 命令（写操作 / 有副作用的上游调用）
//!
//! CQRS 命令侧

mod device_commands;
mod profile_commands;
mod speech_commands;

pub mod handlers;

pub use device_commands::*;
pub use profile_commands::*;
pub use speech_commands::*;
