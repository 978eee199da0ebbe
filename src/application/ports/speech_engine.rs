//! Speech Engine Port - 语音合成服务抽象
//!
//! 定义外部 TTS 服务的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::profile::VoiceSettings;

/// 语音合成错误
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: HTTP {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Voice not found: {0}")]
    VoiceNotFound(String),

    #[error("Invalid voice id: {0:?}")]
    InvalidVoiceId(String),
}

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 要合成的文本
    pub text: String,
    /// 供应商的音色 ID
    pub voice_id: String,
    /// 模型 ID
    pub model_id: String,
    /// 合成参数
    pub settings: VoiceSettings,
}

/// 合成结果
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    /// 原始音频数据
    pub audio_data: Vec<u8>,
    /// MIME 类型（来自 Content-Type，缺省 audio/mpeg）
    pub mime_type: String,
}

/// 音色目录条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub voice_id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// 模型目录条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Speech Engine Port
#[async_trait]
pub trait SpeechEnginePort: Send + Sync {
    /// 获取音色目录
    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError>;

    /// 获取单个音色详情（原样返回供应商 JSON）
    async fn get_voice(&self, voice_id: &str) -> Result<serde_json::Value, SpeechError>;

    /// 获取可用模型
    async fn list_models(&self) -> Result<Vec<ModelInfo>, SpeechError>;

    /// 合成语音，返回完整音频数据
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesizedAudio, SpeechError>;
}
