//! Fake Speech Client - 离线/测试用的语音合成客户端
//!
//! 不访问网络，返回固定音色目录与固定音频数据

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::application::ports::{
    ModelInfo, SpeechEnginePort, SpeechError, SynthesisRequest, SynthesizedAudio, VoiceInfo,
};

/// 固定的占位音频
const PLACEHOLDER_AUDIO: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00fake-mp3";

/// Fake Speech Client
pub struct FakeSpeechClient {
    /// 固定返回的音频数据
    audio_data: Vec<u8>,
    /// 为 true 时所有调用都返回 NetworkError
    unavailable: bool,
    synthesis_calls: AtomicUsize,
    last_request: Mutex<Option<SynthesisRequest>>,
}

impl FakeSpeechClient {
    pub fn new(audio_data: Vec<u8>) -> Self {
        Self {
            audio_data,
            unavailable: false,
            synthesis_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// 使用占位音频创建
    pub fn with_defaults() -> Self {
        tracing::info!("FakeSpeechClient initialized, speech requests will not leave this process");
        Self::new(PLACEHOLDER_AUDIO.to_vec())
    }

    /// 模拟不可达的供应商
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new(Vec::new())
        }
    }

    /// 已执行的合成次数
    pub fn synthesis_calls(&self) -> usize {
        self.synthesis_calls.load(Ordering::SeqCst)
    }

    /// 最近一次合成请求
    pub fn last_request(&self) -> Option<SynthesisRequest> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }

    fn check_available(&self) -> Result<(), SpeechError> {
        if self.unavailable {
            return Err(SpeechError::NetworkError(
                "Cannot connect to speech service: connection refused".to_string(),
            ));
        }
        Ok(())
    }

    fn voices() -> Vec<VoiceInfo> {
        vec![
            VoiceInfo {
                voice_id: "fake-rachel".to_string(),
                name: "Rachel".to_string(),
                category: Some("premade".to_string()),
            },
            VoiceInfo {
                voice_id: "fake-adam".to_string(),
                name: "Adam".to_string(),
                category: Some("premade".to_string()),
            },
        ]
    }
}

#[async_trait]
impl SpeechEnginePort for FakeSpeechClient {
    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        self.check_available()?;
        Ok(Self::voices())
    }

    async fn get_voice(&self, voice_id: &str) -> Result<serde_json::Value, SpeechError> {
        self.check_available()?;
        Self::voices()
            .into_iter()
            .find(|v| v.voice_id == voice_id)
            .map(|v| {
                json!({
                    "voice_id": v.voice_id,
                    "name": v.name,
                    "category": v.category,
                    "settings": {"stability": 0.5, "similarity_boost": 0.5}
                })
            })
            .ok_or_else(|| SpeechError::VoiceNotFound(voice_id.to_string()))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, SpeechError> {
        self.check_available()?;
        Ok(vec![ModelInfo {
            model_id: "eleven_monolingual_v1".to_string(),
            name: Some("Eleven English v1".to_string()),
            description: None,
        }])
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesizedAudio, SpeechError> {
        self.synthesis_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }
        self.check_available()?;

        tracing::debug!(
            voice_id = %request.voice_id,
            text_len = request.text.len(),
            "FakeSpeechClient returning fixed audio"
        );

        Ok(SynthesizedAudio {
            audio_data: self.audio_data.clone(),
            mime_type: "audio/mpeg".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::VoiceSettings;

    fn request() -> SynthesisRequest {
        SynthesisRequest {
            text: "hello".to_string(),
            voice_id: "fake-rachel".to_string(),
            model_id: "eleven_monolingual_v1".to_string(),
            settings: VoiceSettings::default(),
        }
    }

    #[tokio::test]
    async fn test_synthesize_records_request() {
        let client = FakeSpeechClient::new(vec![1, 2, 3]);
        let audio = client.synthesize(request()).await.unwrap();

        assert_eq!(audio.audio_data, vec![1, 2, 3]);
        assert_eq!(client.synthesis_calls(), 1);
        assert_eq!(client.last_request().unwrap().voice_id, "fake-rachel");
    }

    #[tokio::test]
    async fn test_unavailable_fails_every_call() {
        let client = FakeSpeechClient::unavailable();
        assert!(matches!(
            client.list_voices().await,
            Err(SpeechError::NetworkError(_))
        ));
        assert!(client.synthesize(request()).await.is_err());
    }

    #[tokio::test]
    async fn test_get_voice_unknown_id() {
        let client = FakeSpeechClient::with_defaults();
        assert!(client.get_voice("fake-adam").await.is_ok());
        assert!(matches!(
            client.get_voice("nope").await,
            Err(SpeechError::VoiceNotFound(_))
        ));
    }
}
