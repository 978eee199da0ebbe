//! Profile Store Port - 出站端口
//!
//! 语音档案的持久化抽象，具体实现在 infrastructure/persistence 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::profile::{ProfileError, VoiceProfile};

/// 档案库错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Invalid profile: {0}")]
    Invalid(#[from] ProfileError),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Profile Store Port
///
/// 所有写操作在返回前同步落盘
#[async_trait]
pub trait ProfileStorePort: Send + Sync {
    /// 保存档案，同名则覆盖
    async fn save(&self, profile: VoiceProfile) -> Result<VoiceProfile, StoreError>;

    /// 按名称查找
    async fn get(&self, name: &str) -> Result<VoiceProfile, StoreError>;

    /// 按插入顺序列出全部档案
    async fn list(&self) -> Result<Vec<VoiceProfile>, StoreError>;

    /// 删除档案
    async fn delete(&self, name: &str) -> Result<VoiceProfile, StoreError>;
}
