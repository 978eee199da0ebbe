//! Tool Result - 带标签的成功/失败结果

use crate::application::commands::handlers::{DeviceCommandResponse, GeneratedSpeech};
use crate::application::error::{ApplicationError, ErrorKind};
use crate::application::ports::{ModelInfo, VoiceInfo};
use crate::application::queries::handlers::DeviceStatusResponse;
use crate::domain::profile::VoiceProfile;

/// 成功负载
#[derive(Debug, Clone)]
pub enum ToolPayload {
    Voices(Vec<VoiceInfo>),
    VoiceDetails(serde_json::Value),
    Models(Vec<ModelInfo>),
    Speech(GeneratedSpeech),
    ProfileSaved(VoiceProfile),
    Profile(VoiceProfile),
    Profiles(Vec<VoiceProfile>),
    ProfileDeleted(VoiceProfile),
    DeviceCommand(DeviceCommandResponse),
    DeviceStatus(DeviceStatusResponse),
}

/// 失败信息
#[derive(Debug, Clone, PartialEq)]
pub struct ToolFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<ApplicationError> for ToolFailure {
    fn from(err: ApplicationError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// 工具调用结果
#[derive(Debug, Clone)]
pub enum ToolResult {
    Success(ToolPayload),
    Failure(ToolFailure),
}

impl ToolResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolResult::Success(_))
    }

    pub fn payload(&self) -> Option<&ToolPayload> {
        match self {
            ToolResult::Success(payload) => Some(payload),
            ToolResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ToolFailure> {
        match self {
            ToolResult::Success(_) => None,
            ToolResult::Failure(failure) => Some(failure),
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.failure().map(|f| f.kind)
    }
}

impl From<Result<ToolPayload, ApplicationError>> for ToolResult {
    fn from(result: Result<ToolPayload, ApplicationError>) -> Self {
        match result {
            Ok(payload) => ToolResult::Success(payload),
            Err(err) => ToolResult::Failure(err.into()),
        }
    }
}
