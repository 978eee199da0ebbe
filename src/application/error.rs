//! 应用层错误定义
//!
//! 统一的命令/查询错误类型。两个上游各自的错误在这里归一成同一套错误分类

use serde::Serialize;
use thiserror::Error;

use crate::application::ports::{AudioStorageError, DeviceError, SpeechError, StoreError};
use crate::domain::profile::ProfileError;

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// 调用方输入错误
    #[serde(rename = "ValidationError")]
    Validation,
    /// 档案/音色不存在
    NotFound,
    /// 未注册的工具名
    UnknownTool,
    /// 上游不可达或返回非成功状态
    #[serde(rename = "UpstreamError")]
    Upstream,
    /// 上游可达但在语义上拒绝了请求
    #[serde(rename = "RemoteError")]
    Remote,
    /// 超过等待上限
    #[serde(rename = "TimeoutError")]
    Timeout,
    /// 本地持久化失败
    #[serde(rename = "StorageError")]
    Storage,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 7] = [
        ErrorKind::Validation,
        ErrorKind::NotFound,
        ErrorKind::UnknownTool,
        ErrorKind::Upstream,
        ErrorKind::Remote,
        ErrorKind::Timeout,
        ErrorKind::Storage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::UnknownTool => "UnknownTool",
            ErrorKind::Upstream => "UpstreamError",
            ErrorKind::Remote => "RemoteError",
            ErrorKind::Timeout => "TimeoutError",
            ErrorKind::Storage => "StorageError",
        }
    }

    /// 调用方是否可以退避重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Upstream | ErrorKind::Timeout)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 未知工具
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// 上游服务错误
    #[error("Upstream error: {0}")]
    UpstreamError(String),

    /// 上游拒绝
    #[error("Remote error: {0}")]
    RemoteError(String),

    /// 超时
    #[error("Timeout: {0}")]
    Timeout(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ValidationError(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::UnknownTool(_) => ErrorKind::UnknownTool,
            Self::UpstreamError(_) => ErrorKind::Upstream,
            Self::RemoteError(_) => ErrorKind::Remote,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::StorageError(_) => ErrorKind::Storage,
        }
    }
}

impl From<ProfileError> for ApplicationError {
    fn from(err: ProfileError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<StoreError> for ApplicationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(name) => Self::not_found("Voice profile", name),
            StoreError::Invalid(e) => e.into(),
            StoreError::SerializationError(_) | StoreError::IoError(_) => {
                Self::StorageError(err.to_string())
            }
        }
    }
}

impl From<SpeechError> for ApplicationError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Timeout => Self::Timeout("speech provider did not respond in time".into()),
            SpeechError::VoiceNotFound(id) => Self::not_found("Voice", id),
            SpeechError::InvalidVoiceId(_) => Self::ValidationError(err.to_string()),
            SpeechError::NetworkError(_)
            | SpeechError::ServiceError { .. }
            | SpeechError::InvalidResponse(_) => Self::UpstreamError(err.to_string()),
        }
    }
}

impl From<DeviceError> for ApplicationError {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::Timeout => Self::Timeout("device provider did not respond in time".into()),
            DeviceError::Rejected(msg) => Self::RemoteError(msg),
            DeviceError::NetworkError(_)
            | DeviceError::ServiceError { .. }
            | DeviceError::InvalidResponse(_) => Self::UpstreamError(err.to_string()),
        }
    }
}

impl From<AudioStorageError> for ApplicationError {
    fn from(err: AudioStorageError) -> Self {
        Self::StorageError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(ErrorKind::Upstream.is_retryable());
        assert!(ErrorKind::Timeout.is_retryable());
        assert!(!ErrorKind::Validation.is_retryable());
        assert!(!ErrorKind::NotFound.is_retryable());
        assert!(!ErrorKind::UnknownTool.is_retryable());
        assert!(!ErrorKind::Remote.is_retryable());
        assert!(!ErrorKind::Storage.is_retryable());
    }

    #[test]
    fn test_speech_error_mapping() {
        let timeout: ApplicationError = SpeechError::Timeout.into();
        assert_eq!(timeout.kind(), ErrorKind::Timeout);

        let service: ApplicationError = SpeechError::ServiceError {
            status: 500,
            message: "boom".into(),
        }
        .into();
        assert_eq!(service.kind(), ErrorKind::Upstream);

        let missing: ApplicationError = SpeechError::VoiceNotFound("abc".into()).into();
        assert_eq!(missing.kind(), ErrorKind::NotFound);

        let invalid: ApplicationError = SpeechError::InvalidVoiceId("..".into()).into();
        assert_eq!(invalid.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_device_error_mapping() {
        let rejected: ApplicationError = DeviceError::Rejected("unknown device".into()).into();
        assert_eq!(rejected.kind(), ErrorKind::Remote);
        assert_eq!(rejected.to_string(), "Remote error: unknown device");

        let network: ApplicationError = DeviceError::NetworkError("refused".into()).into();
        assert_eq!(network.kind(), ErrorKind::Upstream);
    }

    #[test]
    fn test_store_error_mapping() {
        let missing: ApplicationError = StoreError::NotFound("ghost".into()).into();
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        assert_eq!(missing.to_string(), "Voice profile not found: ghost");

        let invalid: ApplicationError =
            StoreError::Invalid(ProfileError::InvalidSettings("bad".into())).into();
        assert_eq!(invalid.kind(), ErrorKind::Validation);

        let io: ApplicationError = StoreError::IoError("disk full".into()).into();
        assert_eq!(io.kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_kind_serializes_as_tag() {
        let value = serde_json::to_value(ErrorKind::Upstream).unwrap();
        assert_eq!(value, "UpstreamError");
        assert_eq!(
            serde_json::to_value(ErrorKind::NotFound).unwrap(),
            ErrorKind::NotFound.as_str()
        );
    }
}
