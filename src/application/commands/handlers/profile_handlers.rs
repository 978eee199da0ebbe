//! Profile Command Handlers

use std::sync::Arc;

use crate::application::commands::{DeleteProfile, SaveProfile};
use crate::application::error::ApplicationError;
use crate::application::ports::ProfileStorePort;
use crate::domain::profile::{ProfileName, VoiceProfile, VoiceSettings};

// ============================================================================
// SaveProfile
// ============================================================================

/// SaveProfile Handler
pub struct SaveProfileHandler {
    profile_store: Arc<dyn ProfileStorePort>,
}

impl SaveProfileHandler {
    pub fn new(profile_store: Arc<dyn ProfileStorePort>) -> Self {
        Self { profile_store }
    }

    pub async fn handle(&self, command: SaveProfile) -> Result<VoiceProfile, ApplicationError> {
        let name = ProfileName::new(command.name)?;
        let settings = VoiceSettings::with_overrides(command.stability, command.similarity_boost);
        let profile = VoiceProfile::new(name, command.voice_id, settings)?;

        let saved = self.profile_store.save(profile).await?;

        tracing::info!(
            profile = %saved.name(),
            voice_id = %saved.voice_id(),
            "Voice profile saved"
        );

        Ok(saved)
    }
}

// ============================================================================
// DeleteProfile
// ============================================================================

/// DeleteProfile Handler
pub struct DeleteProfileHandler {
    profile_store: Arc<dyn ProfileStorePort>,
}

impl DeleteProfileHandler {
    pub fn new(profile_store: Arc<dyn ProfileStorePort>) -> Self {
        Self { profile_store }
    }

    pub async fn handle(&self, command: DeleteProfile) -> Result<VoiceProfile, ApplicationError> {
        let removed = self.profile_store.delete(&command.name).await?;

        tracing::info!(profile = %removed.name(), "Voice profile deleted");

        Ok(removed)
    }
}
