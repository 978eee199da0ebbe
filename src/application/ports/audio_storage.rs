//! Audio Storage Port - 出站端口
//!
//! 合成音频的落盘抽象。MCP 文本结果只能携带文件路径

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// 音频存储错误
#[derive(Debug, Error)]
pub enum AudioStorageError {
    #[error("IO error: {0}")]
    IoError(String),
}

/// Audio Storage Port
#[async_trait]
pub trait AudioStoragePort: Send + Sync {
    /// 保存音频，返回文件路径
    async fn save_audio(&self, data: &[u8], extension: &str) -> Result<PathBuf, AudioStorageError>;
}
