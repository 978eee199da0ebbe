//! ElevenLabs Client - 调用 ElevenLabs 语音合成 HTTP API
//!
//! 实现 SpeechEnginePort trait
//!
//! 外部 API:
//! GET  {base}/v1/voices                  音色目录
//! GET  {base}/v1/voices/{voice_id}       音色详情
//! GET  {base}/v1/models                  模型列表
//! POST {base}/v1/text-to-speech/{voice}  合成，返回 audio/mpeg 二进制
//! 所有请求携带 `xi-api-key` 头

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{
    ModelInfo, SpeechEnginePort, SpeechError, SynthesisRequest, SynthesizedAudio, VoiceInfo,
};

const XI_API_KEY_HEADER: &str = "xi-api-key";
const DEFAULT_AUDIO_MIME: &str = "audio/mpeg";

/// 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct TtsHttpRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettingsBody,
}

#[derive(Debug, Serialize)]
struct VoiceSettingsBody {
    stability: f32,
    similarity_boost: f32,
}

/// 音色目录响应
#[derive(Debug, Deserialize)]
struct VoicesResponse {
    #[serde(default)]
    voices: Vec<VoiceInfo>,
}

/// ElevenLabs 客户端配置
#[derive(Debug, Clone)]
pub struct ElevenLabsClientConfig {
    /// API 基础 URL
    pub base_url: String,
    /// API Key
    pub api_key: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for ElevenLabsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl ElevenLabsClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// ElevenLabs HTTP 客户端
pub struct ElevenLabsClient {
    client: Client,
    config: ElevenLabsClientConfig,
}

impl ElevenLabsClient {
    /// 创建新的客户端
    pub fn new(config: ElevenLabsClientConfig) -> Result<Self, SpeechError> {
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| SpeechError::NetworkError(format!("Invalid API key header: {}", e)))?;
        headers.insert(XI_API_KEY_HEADER, api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SpeechError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 拼接 API 路径，每段单独做百分号编码
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SpeechError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| SpeechError::NetworkError(format!("Invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| SpeechError::NetworkError("Base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn voice_endpoint(&self, prefix: &[&str], voice_id: &str) -> Result<Url, SpeechError> {
        let voice_id = voice_id.trim();
        if voice_id.is_empty() || voice_id == "." || voice_id == ".." {
            return Err(SpeechError::InvalidVoiceId(voice_id.to_string()));
        }
        let mut segments = prefix.to_vec();
        segments.push(voice_id);
        self.endpoint(&segments)
    }

    fn synthesis_url(&self, voice_id: &str) -> Result<Url, SpeechError> {
        self.voice_endpoint(&["v1", "text-to-speech"], voice_id)
    }

    /// GET 并解析 JSON
    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: Url) -> Result<T, SpeechError> {
        tracing::debug!(url = %url, "Sending ElevenLabs request");

        let response = self.client.get(url).send().await.map_err(map_send_error)?;
        let response = ensure_success(response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to decode JSON: {}", e)))
    }
}

/// reqwest 发送错误映射
fn map_send_error(e: reqwest::Error) -> SpeechError {
    if e.is_timeout() {
        SpeechError::Timeout
    } else if e.is_connect() {
        SpeechError::NetworkError(format!("Cannot connect to speech service: {}", e))
    } else {
        SpeechError::NetworkError(e.to_string())
    }
}

/// 非 2xx 状态转为 ServiceError
async fn ensure_success(response: Response) -> Result<Response, SpeechError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(SpeechError::ServiceError {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl SpeechEnginePort for ElevenLabsClient {
    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        let body: VoicesResponse = self.get_json(self.endpoint(&["v1", "voices"])?).await?;
        Ok(body.voices)
    }

    async fn get_voice(&self, voice_id: &str) -> Result<serde_json::Value, SpeechError> {
        let url = self.voice_endpoint(&["v1", "voices"], voice_id)?;
        match self.get_json(url).await {
            Err(SpeechError::ServiceError { status, .. })
                if status == StatusCode::NOT_FOUND.as_u16() =>
            {
                Err(SpeechError::VoiceNotFound(voice_id.to_string()))
            }
            other => other,
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, SpeechError> {
        self.get_json(self.endpoint(&["v1", "models"])?).await
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesizedAudio, SpeechError> {
        let url = self.synthesis_url(&request.voice_id)?;
        let body = TtsHttpRequest {
            text: &request.text,
            model_id: &request.model_id,
            voice_settings: VoiceSettingsBody {
                stability: request.settings.stability,
                similarity_boost: request.settings.similarity_boost,
            },
        };

        tracing::debug!(
            url = %url,
            text_len = request.text.len(),
            model_id = %request.model_id,
            "Sending synthesis request"
        );

        let response = self
            .client
            .post(url)
            .header(ACCEPT, DEFAULT_AUDIO_MIME)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;
        let response = ensure_success(response).await?;

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_AUDIO_MIME)
            .to_string();

        // 读完整个响应体才算成功，超时则整体放弃
        let audio_data = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SpeechError::Timeout
                } else {
                    SpeechError::InvalidResponse(format!("Failed to read audio: {}", e))
                }
            })?
            .to_vec();

        if audio_data.is_empty() {
            return Err(SpeechError::InvalidResponse(
                "Speech service returned empty audio".to_string(),
            ));
        }

        tracing::info!(
            voice_id = %request.voice_id,
            mime_type = %mime_type,
            audio_size = audio_data.len(),
            "Speech synthesis completed"
        );

        Ok(SynthesizedAudio {
            audio_data,
            mime_type,
        })
    }
}
