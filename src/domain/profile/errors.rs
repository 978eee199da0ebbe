//! Profile Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Invalid profile name: {0}")]
    InvalidName(String),

    #[error("Invalid voice id: {0}")]
    InvalidVoiceId(String),

    #[error("Invalid voice settings: {0}")]
    InvalidSettings(String),
}
