//! Domain Layer - 领域层
//!
//! 限界上下文:
//! - Profile Context: 语音档案

pub mod profile;
