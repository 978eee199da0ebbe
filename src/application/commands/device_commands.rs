//! Device Commands

/// 执行语音控制指令命令
#[derive(Debug, Clone)]
pub struct ExecuteDeviceCommand {
    pub utterance: String,
    /// 语音回执使用的档案
    pub voice_profile: Option<String>,
}
