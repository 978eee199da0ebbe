//! Device Query Handlers

use std::sync::Arc;

use crate::application::commands::handlers::{
    GenerateSpeechFromProfileHandler, GeneratedSpeech, DEFAULT_FEEDBACK_PROFILE,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{DeviceControlPort, DeviceStatus};
use crate::application::queries::GetDeviceStatus;

/// 系统状态响应
#[derive(Debug, Clone)]
pub struct DeviceStatusResponse {
    pub status: DeviceStatus,
    /// 语音播报文本
    pub summary: String,
    pub speech: Option<GeneratedSpeech>,
}

/// GetDeviceStatus Handler
pub struct GetDeviceStatusHandler {
    device: Arc<dyn DeviceControlPort>,
    speaker: GenerateSpeechFromProfileHandler,
}

impl GetDeviceStatusHandler {
    pub fn new(
        device: Arc<dyn DeviceControlPort>,
        speaker: GenerateSpeechFromProfileHandler,
    ) -> Self {
        Self { device, speaker }
    }

    pub async fn handle(
        &self,
        query: GetDeviceStatus,
    ) -> Result<DeviceStatusResponse, ApplicationError> {
        let status = self.device.get_status().await?;
        let summary = status.summary();

        let profile = query
            .voice_profile
            .as_deref()
            .unwrap_or(DEFAULT_FEEDBACK_PROFILE);
        let speech = self.speaker.speak_if_profile_exists(profile, &summary).await;

        Ok(DeviceStatusResponse {
            status,
            summary,
            speech,
        })
    }
}
