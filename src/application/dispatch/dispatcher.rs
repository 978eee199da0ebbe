//! Tool Dispatcher - MCP 工具门面
//!
//! 工具名 → handler 的固定映射。唯一一处把两个上游的异构错误归一成 ToolResult 的地方，
//! 失败永远以结果返回，不会越过这一层

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use super::request::{ToolName, ToolRequest};
use super::result::{ToolPayload, ToolResult};
use crate::application::commands::handlers::{
    DeleteProfileHandler, ExecuteDeviceCommandHandler, GenerateSpeechFromProfileHandler,
    GenerateSpeechHandler, SaveProfileHandler, SpeechOptions,
};
use crate::application::commands::{
    DeleteProfile, ExecuteDeviceCommand, GenerateSpeech, GenerateSpeechFromProfile, SaveProfile,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{DeviceControlPort, ProfileStorePort, SpeechEnginePort};
use crate::application::queries::handlers::{
    GetDeviceStatusHandler, GetProfileHandler, GetVoiceDetailsHandler, ListModelsHandler,
    ListProfilesHandler, ListVoicesHandler,
};
use crate::application::queries::{
    GetDeviceStatus, GetProfile, GetVoiceDetails, ListModels, ListProfiles, ListVoices,
};
use crate::domain::profile::VoiceSettings;

/// Tool Dispatcher
pub struct ToolDispatcher {
    // ========== Command Handlers ==========
    generate_speech_handler: GenerateSpeechHandler,
    generate_from_profile_handler: GenerateSpeechFromProfileHandler,
    save_profile_handler: SaveProfileHandler,
    delete_profile_handler: DeleteProfileHandler,
    execute_device_command_handler: ExecuteDeviceCommandHandler,

    // ========== Query Handlers ==========
    list_voices_handler: ListVoicesHandler,
    get_voice_details_handler: GetVoiceDetailsHandler,
    list_models_handler: ListModelsHandler,
    get_profile_handler: GetProfileHandler,
    list_profiles_handler: ListProfilesHandler,
    get_device_status_handler: GetDeviceStatusHandler,
}

impl ToolDispatcher {
    pub fn new(
        speech_engine: Arc<dyn SpeechEnginePort>,
        device: Arc<dyn DeviceControlPort>,
        profile_store: Arc<dyn ProfileStorePort>,
        speech_options: SpeechOptions,
    ) -> Self {
        let generate = GenerateSpeechHandler::new(speech_engine.clone(), speech_options);
        let from_profile =
            GenerateSpeechFromProfileHandler::new(profile_store.clone(), generate.clone());

        Self {
            // Command handlers
            generate_speech_handler: generate,
            generate_from_profile_handler: from_profile.clone(),
            save_profile_handler: SaveProfileHandler::new(profile_store.clone()),
            delete_profile_handler: DeleteProfileHandler::new(profile_store.clone()),
            execute_device_command_handler: ExecuteDeviceCommandHandler::new(
                device.clone(),
                from_profile.clone(),
            ),

            // Query handlers
            list_voices_handler: ListVoicesHandler::new(speech_engine.clone()),
            get_voice_details_handler: GetVoiceDetailsHandler::new(speech_engine.clone()),
            list_models_handler: ListModelsHandler::new(speech_engine),
            get_profile_handler: GetProfileHandler::new(profile_store.clone()),
            list_profiles_handler: ListProfilesHandler::new(profile_store),
            get_device_status_handler: GetDeviceStatusHandler::new(device, from_profile),
        }
    }

    /// 执行一次工具调用
    pub async fn dispatch(&self, tool_name: &str, args: Value) -> ToolResult {
        let started = Instant::now();
        let result: ToolResult = self.route(tool_name, args).await.into();
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            ToolResult::Success(_) => {
                tracing::info!(tool = %tool_name, elapsed_ms, "Tool call succeeded");
            }
            ToolResult::Failure(failure) => {
                tracing::warn!(
                    tool = %tool_name,
                    kind = %failure.kind,
                    retryable = failure.kind.is_retryable(),
                    error = %failure.message,
                    elapsed_ms,
                    "Tool call failed"
                );
            }
        }

        result
    }

    async fn route(&self, tool_name: &str, args: Value) -> Result<ToolPayload, ApplicationError> {
        let tool = ToolName::from_str(tool_name)
            .ok_or_else(|| ApplicationError::UnknownTool(tool_name.to_string()))?;
        let request = ToolRequest::parse(tool, args)?;
        self.execute(request).await
    }

    /// 执行已校验的请求
    pub async fn execute(&self, request: ToolRequest) -> Result<ToolPayload, ApplicationError> {
        let payload = match request {
            ToolRequest::ListVoices => {
                ToolPayload::Voices(self.list_voices_handler.handle(ListVoices).await?)
            }
            ToolRequest::GetVoiceDetails(args) => ToolPayload::VoiceDetails(
                self.get_voice_details_handler
                    .handle(GetVoiceDetails {
                        voice_id: args.voice_id,
                    })
                    .await?,
            ),
            ToolRequest::ListModels => {
                ToolPayload::Models(self.list_models_handler.handle(ListModels).await?)
            }
            ToolRequest::GenerateSpeech(args) => {
                let settings = (args.stability.is_some() || args.similarity_boost.is_some())
                    .then(|| VoiceSettings::with_overrides(args.stability, args.similarity_boost));
                ToolPayload::Speech(
                    self.generate_speech_handler
                        .handle(GenerateSpeech {
                            text: args.text,
                            voice_id: args.voice_id,
                            model_id: args.model_id,
                            settings,
                        })
                        .await?,
                )
            }
            ToolRequest::CreateVoiceProfile(args) => ToolPayload::ProfileSaved(
                self.save_profile_handler
                    .handle(SaveProfile {
                        name: args.name,
                        voice_id: args.voice_id,
                        stability: args.stability,
                        similarity_boost: args.similarity_boost,
                    })
                    .await?,
            ),
            ToolRequest::GetVoiceProfile(args) => ToolPayload::Profile(
                self.get_profile_handler
                    .handle(GetProfile { name: args.name })
                    .await?,
            ),
            ToolRequest::ListVoiceProfiles => {
                ToolPayload::Profiles(self.list_profiles_handler.handle(ListProfiles).await?)
            }
            ToolRequest::DeleteVoiceProfile(args) => ToolPayload::ProfileDeleted(
                self.delete_profile_handler
                    .handle(DeleteProfile { name: args.name })
                    .await?,
            ),
            ToolRequest::GenerateSpeechFromProfile(args) => ToolPayload::Speech(
                self.generate_from_profile_handler
                    .handle(GenerateSpeechFromProfile {
                        profile_name: args.profile_name,
                        text: args.text,
                    })
                    .await?,
            ),
            ToolRequest::MiaVoiceCommand(args) => ToolPayload::DeviceCommand(
                self.execute_device_command_handler
                    .handle(ExecuteDeviceCommand {
                        utterance: args.command,
                        voice_profile: args.voice_profile,
                    })
                    .await?,
            ),
            ToolRequest::MiaGetStatus(args) => ToolPayload::DeviceStatus(
                self.get_device_status_handler
                    .handle(GetDeviceStatus {
                        voice_profile: args.voice_profile,
                    })
                    .await?,
            ),
        };

        Ok(payload)
    }
}
