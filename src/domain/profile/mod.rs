//! Profile Context - 语音档案限界上下文
//!
//! 职责:
//! - 命名语音档案（voice id + 合成参数）
//! - 档案字段校验

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::VoiceProfile;
pub use errors::ProfileError;
pub use value_objects::{ProfileName, VoiceSettings, MAX_PROFILE_NAME_CHARS};
