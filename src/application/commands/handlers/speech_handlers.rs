//! Speech Command Handlers

use std::sync::Arc;

use crate::application::commands::{GenerateSpeech, GenerateSpeechFromProfile};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ProfileStorePort, SpeechEnginePort, StoreError, SynthesisRequest,
};

/// 合成选项（来自配置）
#[derive(Debug, Clone)]
pub struct SpeechOptions {
    /// 默认模型 ID
    pub default_model_id: String,
    /// 单次合成文本的字符上限
    pub max_text_chars: usize,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            default_model_id: "eleven_monolingual_v1".to_string(),
            max_text_chars: 5000,
        }
    }
}

/// 合成结果
#[derive(Debug, Clone)]
pub struct GeneratedSpeech {
    pub audio_data: Vec<u8>,
    pub mime_type: String,
    pub voice_id: String,
    pub text: String,
    /// 通过档案合成时的档案名
    pub profile_name: Option<String>,
}

// ============================================================================
// GenerateSpeech
// ============================================================================

/// GenerateSpeech Handler
#[derive(Clone)]
pub struct GenerateSpeechHandler {
    speech_engine: Arc<dyn SpeechEnginePort>,
    options: SpeechOptions,
}

impl GenerateSpeechHandler {
    pub fn new(speech_engine: Arc<dyn SpeechEnginePort>, options: SpeechOptions) -> Self {
        Self {
            speech_engine,
            options,
        }
    }

    pub async fn handle(
        &self,
        command: GenerateSpeech,
    ) -> Result<GeneratedSpeech, ApplicationError> {
        self.validate(&command)?;

        let settings = command.settings.unwrap_or_default();
        let request = SynthesisRequest {
            text: command.text.clone(),
            voice_id: command.voice_id.clone(),
            model_id: command
                .model_id
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| self.options.default_model_id.clone()),
            settings,
        };

        let audio = self.speech_engine.synthesize(request).await?;

        tracing::info!(
            voice_id = %command.voice_id,
            text_chars = command.text.chars().count(),
            audio_size = audio.audio_data.len(),
            "Speech generated"
        );

        Ok(GeneratedSpeech {
            audio_data: audio.audio_data,
            mime_type: audio.mime_type,
            voice_id: command.voice_id,
            text: command.text,
            profile_name: None,
        })
    }

    fn validate(&self, command: &GenerateSpeech) -> Result<(), ApplicationError> {
        if command.text.trim().is_empty() {
            return Err(ApplicationError::validation("text cannot be empty"));
        }
        let chars = command.text.chars().count();
        if chars > self.options.max_text_chars {
            return Err(ApplicationError::validation(format!(
                "text is {} characters, limit is {}",
                chars, self.options.max_text_chars
            )));
        }
        if command.voice_id.trim().is_empty() {
            return Err(ApplicationError::validation("voice_id cannot be empty"));
        }
        if let Some(settings) = &command.settings {
            settings.validate()?;
        }
        Ok(())
    }
}

// ============================================================================
// GenerateSpeechFromProfile
// ============================================================================

/// GenerateSpeechFromProfile Handler
#[derive(Clone)]
pub struct GenerateSpeechFromProfileHandler {
    profile_store: Arc<dyn ProfileStorePort>,
    generate: GenerateSpeechHandler,
}

impl GenerateSpeechFromProfileHandler {
    pub fn new(profile_store: Arc<dyn ProfileStorePort>, generate: GenerateSpeechHandler) -> Self {
        Self {
            profile_store,
            generate,
        }
    }

    pub async fn handle(
        &self,
        command: GenerateSpeechFromProfile,
    ) -> Result<GeneratedSpeech, ApplicationError> {
        // 档案不存在时不访问语音服务
        let profile = self.profile_store.get(&command.profile_name).await?;

        let mut speech = self
            .generate
            .handle(GenerateSpeech {
                text: command.text,
                voice_id: profile.voice_id().to_string(),
                model_id: None,
                settings: Some(*profile.settings()),
            })
            .await?;

        speech.profile_name = Some(command.profile_name);
        Ok(speech)
    }

    /// 尽力而为的语音回执
    ///
    /// 档案不存在或合成失败都只记录日志，返回 None
    pub async fn speak_if_profile_exists(
        &self,
        profile_name: &str,
        text: &str,
    ) -> Option<GeneratedSpeech> {
        let profile = match self.profile_store.get(profile_name).await {
            Ok(profile) => profile,
            Err(StoreError::NotFound(_)) => {
                tracing::debug!(profile = %profile_name, "No voice profile for spoken feedback");
                return None;
            }
            Err(e) => {
                tracing::warn!(profile = %profile_name, error = %e, "Failed to load voice profile");
                return None;
            }
        };

        let command = GenerateSpeech {
            text: text.to_string(),
            voice_id: profile.voice_id().to_string(),
            model_id: None,
            settings: Some(*profile.settings()),
        };

        match self.generate.handle(command).await {
            Ok(mut speech) => {
                speech.profile_name = Some(profile_name.to_string());
                Some(speech)
            }
            Err(e) => {
                tracing::warn!(
                    profile = %profile_name,
                    error = %e,
                    "Spoken feedback synthesis failed"
                );
                None
            }
        }
    }
}

/// 未提供档案名时使用的默认档案
pub const DEFAULT_FEEDBACK_PROFILE: &str = "default";
