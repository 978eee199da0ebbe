//! Profile Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProfileError, ProfileName, VoiceSettings};

/// VoiceProfile 聚合根
///
/// 不变量:
/// - name 在档案库内唯一
/// - voice_id 非空
/// - settings 的每一项都在 [0, 1] 内
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    name: ProfileName,
    voice_id: String,
    settings: VoiceSettings,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VoiceProfile {
    /// 创建新档案（校验 voice_id 与 settings）
    pub fn new(
        name: ProfileName,
        voice_id: impl Into<String>,
        settings: VoiceSettings,
    ) -> Result<Self, ProfileError> {
        let profile = Self::new_unchecked(name, voice_id, settings);
        profile.validate()?;
        Ok(profile)
    }

    /// 创建档案但不校验，校验推迟到存储层 save 时
    pub fn new_unchecked(
        name: ProfileName,
        voice_id: impl Into<String>,
        settings: VoiceSettings,
    ) -> Self {
        let now = Utc::now();
        Self {
            name,
            voice_id: voice_id.into(),
            settings,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.voice_id.trim().is_empty() {
            return Err(ProfileError::InvalidVoiceId(
                "voice id cannot be empty".to_string(),
            ));
        }
        self.settings.validate()
    }

    /// 覆盖同名档案时保留原创建时间
    pub fn replacing(mut self, previous: &VoiceProfile) -> Self {
        self.created_at = previous.created_at;
        self.updated_at = Utc::now();
        self
    }

    // Getters
    pub fn name(&self) -> &ProfileName {
        &self.name
    }

    pub fn voice_id(&self) -> &str {
        &self.voice_id
    }

    pub fn settings(&self) -> &VoiceSettings {
        &self.settings
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
