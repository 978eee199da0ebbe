//! Tool Requests - 每个工具一个带类型的请求变体
//!
//! 参数在进入任何 handler 之前完成反序列化与形状校验

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::application::error::ApplicationError;

/// 已注册的工具名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    ListVoices,
    GetVoiceDetails,
    ListModels,
    GenerateSpeech,
    CreateVoiceProfile,
    GetVoiceProfile,
    ListVoiceProfiles,
    DeleteVoiceProfile,
    GenerateSpeechFromProfile,
    MiaVoiceCommand,
    MiaGetStatus,
}

impl ToolName {
    /// 全部工具，按 tools/list 展示顺序
    pub const ALL: [ToolName; 11] = [
        ToolName::ListVoices,
        ToolName::GetVoiceDetails,
        ToolName::ListModels,
        ToolName::GenerateSpeech,
        ToolName::CreateVoiceProfile,
        ToolName::GetVoiceProfile,
        ToolName::ListVoiceProfiles,
        ToolName::DeleteVoiceProfile,
        ToolName::GenerateSpeechFromProfile,
        ToolName::MiaVoiceCommand,
        ToolName::MiaGetStatus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::ListVoices => "elevenlabs_list_voices",
            ToolName::GetVoiceDetails => "elevenlabs_get_voice_details",
            ToolName::ListModels => "elevenlabs_list_models",
            ToolName::GenerateSpeech => "elevenlabs_generate_speech",
            ToolName::CreateVoiceProfile => "elevenlabs_create_voice_profile",
            ToolName::GetVoiceProfile => "elevenlabs_get_voice_profile",
            ToolName::ListVoiceProfiles => "elevenlabs_list_voice_profiles",
            ToolName::DeleteVoiceProfile => "elevenlabs_delete_voice_profile",
            ToolName::GenerateSpeechFromProfile => "elevenlabs_generate_speech_from_profile",
            ToolName::MiaVoiceCommand => "mia_voice_command",
            ToolName::MiaGetStatus => "mia_get_status_voice",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tool| tool.as_str() == s)
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Argument shapes
// ============================================================================

/// 无参数工具（允许空对象或 null）
#[derive(Debug, Clone, Deserialize)]
pub struct NoArgs {}

#[derive(Debug, Clone, Deserialize)]
pub struct GetVoiceDetailsArgs {
    pub voice_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateSpeechArgs {
    pub text: String,
    pub voice_id: String,
    pub model_id: Option<String>,
    pub stability: Option<f32>,
    pub similarity_boost: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVoiceProfileArgs {
    pub name: String,
    pub voice_id: String,
    pub stability: Option<f32>,
    pub similarity_boost: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileNameArgs {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateSpeechFromProfileArgs {
    pub text: String,
    pub profile_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MiaVoiceCommandArgs {
    pub command: String,
    pub voice_profile: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MiaStatusArgs {
    pub voice_profile: Option<String>,
}

// ============================================================================
// ToolRequest
// ============================================================================

/// 已校验的工具请求
#[derive(Debug, Clone)]
pub enum ToolRequest {
    ListVoices,
    GetVoiceDetails(GetVoiceDetailsArgs),
    ListModels,
    GenerateSpeech(GenerateSpeechArgs),
    CreateVoiceProfile(CreateVoiceProfileArgs),
    GetVoiceProfile(ProfileNameArgs),
    ListVoiceProfiles,
    DeleteVoiceProfile(ProfileNameArgs),
    GenerateSpeechFromProfile(GenerateSpeechFromProfileArgs),
    MiaVoiceCommand(MiaVoiceCommandArgs),
    MiaGetStatus(MiaStatusArgs),
}

impl ToolRequest {
    /// 按工具的参数形状解析原始 JSON 参数
    pub fn parse(tool: ToolName, args: Value) -> Result<Self, ApplicationError> {
        let args = match args {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        let request = match tool {
            ToolName::ListVoices => {
                decode::<NoArgs>(tool, args)?;
                ToolRequest::ListVoices
            }
            ToolName::GetVoiceDetails => ToolRequest::GetVoiceDetails(decode(tool, args)?),
            ToolName::ListModels => {
                decode::<NoArgs>(tool, args)?;
                ToolRequest::ListModels
            }
            ToolName::GenerateSpeech => ToolRequest::GenerateSpeech(decode(tool, args)?),
            ToolName::CreateVoiceProfile => ToolRequest::CreateVoiceProfile(decode(tool, args)?),
            ToolName::GetVoiceProfile => ToolRequest::GetVoiceProfile(decode(tool, args)?),
            ToolName::ListVoiceProfiles => {
                decode::<NoArgs>(tool, args)?;
                ToolRequest::ListVoiceProfiles
            }
            ToolName::DeleteVoiceProfile => ToolRequest::DeleteVoiceProfile(decode(tool, args)?),
            ToolName::GenerateSpeechFromProfile => {
                ToolRequest::GenerateSpeechFromProfile(decode(tool, args)?)
            }
            ToolName::MiaVoiceCommand => ToolRequest::MiaVoiceCommand(decode(tool, args)?),
            ToolName::MiaGetStatus => ToolRequest::MiaGetStatus(decode(tool, args)?),
        };

        Ok(request)
    }

    pub fn tool(&self) -> ToolName {
        match self {
            ToolRequest::ListVoices => ToolName::ListVoices,
            ToolRequest::GetVoiceDetails(_) => ToolName::GetVoiceDetails,
            ToolRequest::ListModels => ToolName::ListModels,
            ToolRequest::GenerateSpeech(_) => ToolName::GenerateSpeech,
            ToolRequest::CreateVoiceProfile(_) => ToolName::CreateVoiceProfile,
            ToolRequest::GetVoiceProfile(_) => ToolName::GetVoiceProfile,
            ToolRequest::ListVoiceProfiles => ToolName::ListVoiceProfiles,
            ToolRequest::DeleteVoiceProfile(_) => ToolName::DeleteVoiceProfile,
            ToolRequest::GenerateSpeechFromProfile(_) => ToolName::GenerateSpeechFromProfile,
            ToolRequest::MiaVoiceCommand(_) => ToolName::MiaVoiceCommand,
            ToolRequest::MiaGetStatus(_) => ToolName::MiaGetStatus,
        }
    }
}

fn decode<T: DeserializeOwned>(tool: ToolName, args: Value) -> Result<T, ApplicationError> {
    serde_json::from_value(args).map_err(|e| {
        ApplicationError::validation(format!("invalid arguments for {}: {}", tool, e))
    })
}
