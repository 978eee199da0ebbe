//! Profile Commands

/// 保存（创建或覆盖）档案命令
#[derive(Debug, Clone)]
pub struct SaveProfile {
    pub name: String,
    pub voice_id: String,
    pub stability: Option<f32>,
    pub similarity_boost: Option<f32>,
}

/// 删除档案命令
#[derive(Debug, Clone)]
pub struct DeleteProfile {
    pub name: String,
}
