//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod device;
pub mod speech;
pub mod storage;

pub use device::*;
pub use speech::*;
pub use storage::*;
