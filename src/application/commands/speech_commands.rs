//! Speech Commands

use crate::domain::profile::VoiceSettings;

/// 合成语音命令
#[derive(Debug, Clone)]
pub struct GenerateSpeech {
    pub text: String,
    pub voice_id: String,
    /// 缺省使用配置中的默认模型
    pub model_id: Option<String>,
    /// 缺省使用默认合成参数
    pub settings: Option<VoiceSettings>,
}

/// 使用已保存档案合成语音命令
#[derive(Debug, Clone)]
pub struct GenerateSpeechFromProfile {
    pub profile_name: String,
    pub text: String,
}
