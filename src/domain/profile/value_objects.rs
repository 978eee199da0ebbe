//! Profile Context - Value Objects

use serde::{Deserialize, Serialize};

use super::ProfileError;

/// 档案名称最大长度（字符）
pub const MAX_PROFILE_NAME_CHARS: usize = 100;

/// 档案名称（档案的唯一键）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileName(String);

impl ProfileName {
    pub fn new(name: impl Into<String>) -> Result<Self, ProfileError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProfileError::InvalidName(
                "profile name cannot be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_PROFILE_NAME_CHARS {
            return Err(ProfileError::InvalidName(format!(
                "profile name cannot exceed {} characters",
                MAX_PROFILE_NAME_CHARS
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProfileName {
    type Error = ProfileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProfileName> for String {
    fn from(name: ProfileName) -> Self {
        name.0
    }
}

impl std::fmt::Display for ProfileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 语音合成参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// 稳定性 (0.0 - 1.0)
    pub stability: f32,
    /// 相似度增强 (0.0 - 1.0)
    pub similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.5,
        }
    }
}

impl VoiceSettings {
    pub fn new(stability: f32, similarity_boost: f32) -> Self {
        Self {
            stability,
            similarity_boost,
        }
    }

    /// 用可选覆盖值构造，缺省项使用默认值
    pub fn with_overrides(stability: Option<f32>, similarity_boost: Option<f32>) -> Self {
        let defaults = Self::default();
        Self {
            stability: stability.unwrap_or(defaults.stability),
            similarity_boost: similarity_boost.unwrap_or(defaults.similarity_boost),
        }
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        check_unit_range("stability", self.stability)?;
        check_unit_range("similarity_boost", self.similarity_boost)?;
        Ok(())
    }
}

fn check_unit_range(field: &str, value: f32) -> Result<(), ProfileError> {
    // NaN 不满足 contains
    if !(0.0..=1.0).contains(&value) {
        return Err(ProfileError::InvalidSettings(format!(
            "{} must be between 0.0 and 1.0, got {}",
            field, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_name_rejects_blank() {
        assert!(ProfileName::new("").is_err());
        assert!(ProfileName::new("   ").is_err());
        assert!(ProfileName::new("helpful-assistant").is_ok());
    }

    #[test]
    fn test_profile_name_length_limit_counts_chars() {
        let name: String = "语".repeat(MAX_PROFILE_NAME_CHARS);
        assert!(ProfileName::new(name).is_ok());

        let too_long: String = "a".repeat(MAX_PROFILE_NAME_CHARS + 1);
        assert!(ProfileName::new(too_long).is_err());
    }

    #[test]
    fn test_settings_validation() {
        assert!(VoiceSettings::new(0.0, 1.0).validate().is_ok());
        assert!(VoiceSettings::new(1.5, 0.5).validate().is_err());
        assert!(VoiceSettings::new(0.5, -0.1).validate().is_err());
        assert!(VoiceSettings::new(f32::NAN, 0.5).validate().is_err());
    }

    #[test]
    fn test_settings_overrides() {
        let settings = VoiceSettings::with_overrides(Some(0.9), None);
        assert_eq!(settings.stability, 0.9);
        assert_eq!(settings.similarity_boost, 0.5);
    }
}
