//! Device Control Port - IoT 控制服务抽象
//!
//! 自然语言指令的解析完全交给上游服务，本地不做任何解析

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 设备控制错误
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: HTTP {status}: {message}")]
    ServiceError { status: u16, message: String },

    /// 上游可达，但明确拒绝执行（如未知设备）
    #[error("Command rejected: {0}")]
    Rejected(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 指令执行结果（上游返回的结构化 JSON）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub command: String,
    pub result: serde_json::Value,
}

/// 系统状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    #[serde(default)]
    pub healthy: bool,
    #[serde(default)]
    pub devices: Vec<serde_json::Value>,
    /// 上游返回的其余字段
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DeviceStatus {
    /// 适合语音播报的状态摘要
    pub fn summary(&self) -> String {
        let health = if self.healthy {
            "System is healthy."
        } else {
            "System has issues."
        };
        format!(
            "MIA system status: {} {} devices connected.",
            health,
            self.devices.len()
        )
    }
}

/// Device Control Port
#[async_trait]
pub trait DeviceControlPort: Send + Sync {
    /// 转发语音指令
    async fn execute_command(&self, utterance: &str) -> Result<CommandOutcome, DeviceError>;

    /// 获取系统/设备状态
    async fn get_status(&self) -> Result<DeviceStatus, DeviceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_summary() {
        let status: DeviceStatus = serde_json::from_value(json!({
            "healthy": true,
            "devices": [{"id": "lamp"}, {"id": "fan"}],
            "uptime": 42
        }))
        .unwrap();

        assert_eq!(
            status.summary(),
            "MIA system status: System is healthy. 2 devices connected."
        );
        assert_eq!(status.extra["uptime"], 42);
    }

    #[test]
    fn test_status_defaults_when_fields_missing() {
        let status: DeviceStatus = serde_json::from_value(json!({})).unwrap();
        assert!(!status.healthy);
        assert_eq!(
            status.summary(),
            "MIA system status: System has issues. 0 devices connected."
        );
    }
}
