//! Voice Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{ModelInfo, SpeechEnginePort, VoiceInfo};
use crate::application::queries::{GetVoiceDetails, ListModels, ListVoices};

/// ListVoices Handler
pub struct ListVoicesHandler {
    speech_engine: Arc<dyn SpeechEnginePort>,
}

impl ListVoicesHandler {
    pub fn new(speech_engine: Arc<dyn SpeechEnginePort>) -> Self {
        Self { speech_engine }
    }

    pub async fn handle(&self, _query: ListVoices) -> Result<Vec<VoiceInfo>, ApplicationError> {
        let voices = self.speech_engine.list_voices().await?;
        tracing::debug!(count = voices.len(), "Voice catalog fetched");
        Ok(voices)
    }
}

/// GetVoiceDetails Handler
pub struct GetVoiceDetailsHandler {
    speech_engine: Arc<dyn SpeechEnginePort>,
}

impl GetVoiceDetailsHandler {
    pub fn new(speech_engine: Arc<dyn SpeechEnginePort>) -> Self {
        Self { speech_engine }
    }

    pub async fn handle(
        &self,
        query: GetVoiceDetails,
    ) -> Result<serde_json::Value, ApplicationError> {
        if query.voice_id.trim().is_empty() {
            return Err(ApplicationError::validation("voice_id cannot be empty"));
        }
        Ok(self.speech_engine.get_voice(&query.voice_id).await?)
    }
}

/// ListModels Handler
pub struct ListModelsHandler {
    speech_engine: Arc<dyn SpeechEnginePort>,
}

impl ListModelsHandler {
    pub fn new(speech_engine: Arc<dyn SpeechEnginePort>) -> Self {
        Self { speech_engine }
    }

    pub async fn handle(&self, _query: ListModels) -> Result<Vec<ModelInfo>, ApplicationError> {
        Ok(self.speech_engine.list_models().await?)
    }
}
