//! Device Command Handlers

use std::sync::Arc;

use super::speech_handlers::{
    GenerateSpeechFromProfileHandler, GeneratedSpeech, DEFAULT_FEEDBACK_PROFILE,
};
use crate::application::commands::ExecuteDeviceCommand;
use crate::application::error::ApplicationError;
use crate::application::ports::{CommandOutcome, DeviceControlPort};

/// 指令执行响应
#[derive(Debug, Clone)]
pub struct DeviceCommandResponse {
    pub outcome: CommandOutcome,
    /// 语音回执文本
    pub summary: String,
    pub speech: Option<GeneratedSpeech>,
}

/// ExecuteDeviceCommand Handler
pub struct ExecuteDeviceCommandHandler {
    device: Arc<dyn DeviceControlPort>,
    speaker: GenerateSpeechFromProfileHandler,
}

impl ExecuteDeviceCommandHandler {
    pub fn new(
        device: Arc<dyn DeviceControlPort>,
        speaker: GenerateSpeechFromProfileHandler,
    ) -> Self {
        Self { device, speaker }
    }

    pub async fn handle(
        &self,
        command: ExecuteDeviceCommand,
    ) -> Result<DeviceCommandResponse, ApplicationError> {
        let utterance = command.utterance.trim();
        if utterance.is_empty() {
            return Err(ApplicationError::validation("command cannot be empty"));
        }

        let outcome = self.device.execute_command(utterance).await?;

        tracing::info!(command = %utterance, "Voice command executed");

        let summary = format!(
            "Voice command executed: {}. Command completed successfully.",
            utterance
        );
        let profile = command
            .voice_profile
            .as_deref()
            .unwrap_or(DEFAULT_FEEDBACK_PROFILE);
        let speech = self.speaker.speak_if_profile_exists(profile, &summary).await;

        Ok(DeviceCommandResponse {
            outcome,
            summary,
            speech,
        })
    }
}
