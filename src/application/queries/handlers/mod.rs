//! Query Handlers 实现

mod device_handlers;
mod profile_handlers;
mod voice_handlers;

pub use device_handlers::*;
pub use profile_handlers::*;
pub use voice_handlers::*;
