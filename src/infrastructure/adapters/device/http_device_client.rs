//! HTTP Device Client - 调用 MIA IoT 服务
//!
//! 实现 DeviceControlPort trait
//!
//! POST {base}/voice-command  转发语音指令
//! GET  {base}/status         系统状态

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::application::ports::{CommandOutcome, DeviceControlPort, DeviceError, DeviceStatus};

/// 指令请求体
#[derive(Debug, Serialize)]
struct VoiceCommandBody<'a> {
    command: &'a str,
    source: &'static str,
    timestamp: String,
}

/// MIA 客户端配置
#[derive(Debug, Clone)]
pub struct HttpDeviceClientConfig {
    pub host: String,
    pub port: u16,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpDeviceClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8000,
            timeout_secs: 10,
        }
    }
}

impl HttpDeviceClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// 服务基础 URL
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// MIA HTTP 客户端
pub struct HttpDeviceClient {
    client: Client,
    base_url: String,
}

impl HttpDeviceClient {
    pub fn new(config: HttpDeviceClientConfig) -> Result<Self, DeviceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DeviceError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }
}

fn map_send_error(e: reqwest::Error) -> DeviceError {
    if e.is_timeout() {
        DeviceError::Timeout
    } else if e.is_connect() {
        DeviceError::NetworkError(format!("Cannot connect to MIA service: {}", e))
    } else {
        DeviceError::NetworkError(e.to_string())
    }
}

/// 读取完整响应体，读取超时同样视为超时
async fn read_body(response: Response) -> Result<(StatusCode, String), DeviceError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            DeviceError::Timeout
        } else {
            DeviceError::InvalidResponse(e.to_string())
        }
    })?;
    Ok((status, body))
}

/// 2xx 响应体解析为 JSON，空响应体（如 204）视为空对象
fn decode_json(body: &str) -> Result<Value, DeviceError> {
    if body.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(body)
        .map_err(|e| DeviceError::InvalidResponse(format!("Failed to decode JSON: {}", e)))
}

/// 读取指令响应，4xx 视为拒绝，5xx 视为服务故障
async fn read_json(response: Response) -> Result<Value, DeviceError> {
    let (status, body) = read_body(response).await?;

    if status.is_client_error() {
        return Err(DeviceError::Rejected(rejection_message(&body, status.as_u16())));
    }
    if !status.is_success() {
        return Err(DeviceError::ServiceError {
            status: status.as_u16(),
            message: body,
        });
    }

    decode_json(&body)
}

/// 从上游错误体中取出可读的原因
fn rejection_message(body: &str, status: u16) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["error", "detail", "message"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str))
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {}", status)
            } else {
                body.trim().to_string()
            }
        })
}

/// 2xx 响应中显式的失败标记
fn embedded_failure(result: &Value) -> Option<String> {
    if let Some(error) = result.get("error").filter(|e| !e.is_null()) {
        return Some(
            error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string()),
        );
    }
    if result.get("success").and_then(Value::as_bool) == Some(false) {
        return Some(
            result
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("command was not executed")
                .to_string(),
        );
    }
    None
}

#[async_trait]
impl DeviceControlPort for HttpDeviceClient {
    async fn execute_command(&self, utterance: &str) -> Result<CommandOutcome, DeviceError> {
        let url = format!("{}/voice-command", self.base_url);
        let body = VoiceCommandBody {
            command: utterance,
            source: "voice",
            timestamp: Utc::now().to_rfc3339(),
        };

        tracing::debug!(url = %url, command = %utterance, "Forwarding voice command");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;
        let result = read_json(response).await?;

        if let Some(reason) = embedded_failure(&result) {
            tracing::warn!(command = %utterance, reason = %reason, "MIA rejected voice command");
            return Err(DeviceError::Rejected(reason));
        }

        Ok(CommandOutcome {
            command: utterance.to_string(),
            result,
        })
    }

    async fn get_status(&self) -> Result<DeviceStatus, DeviceError> {
        let url = format!("{}/status", self.base_url);
        tracing::debug!(url = %url, "Fetching MIA status");

        let response = self.client.get(&url).send().await.map_err(map_send_error)?;
        let (status, body) = read_body(response).await?;
        if !status.is_success() {
            return Err(DeviceError::ServiceError {
                status: status.as_u16(),
                message: body,
            });
        }

        let value = decode_json(&body)?;
        if let Some(reason) = embedded_failure(&value) {
            tracing::warn!(reason = %reason, "MIA status reported an error");
            return Err(DeviceError::ServiceError {
                status: status.as_u16(),
                message: reason,
            });
        }

        serde_json::from_value(value)
            .map_err(|e| DeviceError::InvalidResponse(format!("Failed to decode status: {}", e)))
    }
}
