//! Device Queries

/// 获取系统状态查询
#[derive(Debug, Clone)]
pub struct GetDeviceStatus {
    /// 语音播报使用的档案
    pub voice_profile: Option<String>,
}
