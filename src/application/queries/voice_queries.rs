//! Voice Queries - 供应商音色目录

/// 列出所有音色查询
#[derive(Debug, Clone)]
pub struct ListVoices;

/// 获取音色详情查询
#[derive(Debug, Clone)]
pub struct GetVoiceDetails {
    pub voice_id: String,
}

/// 列出可用模型查询
#[derive(Debug, Clone)]
pub struct ListModels;
