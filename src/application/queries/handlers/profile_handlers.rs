//! Profile Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::ProfileStorePort;
use crate::application::queries::{GetProfile, ListProfiles};
use crate::domain::profile::VoiceProfile;

/// GetProfile Handler
pub struct GetProfileHandler {
    profile_store: Arc<dyn ProfileStorePort>,
}

impl GetProfileHandler {
    pub fn new(profile_store: Arc<dyn ProfileStorePort>) -> Self {
        Self { profile_store }
    }

    pub async fn handle(&self, query: GetProfile) -> Result<VoiceProfile, ApplicationError> {
        Ok(self.profile_store.get(&query.name).await?)
    }
}

/// ListProfiles Handler
pub struct ListProfilesHandler {
    profile_store: Arc<dyn ProfileStorePort>,
}

impl ListProfilesHandler {
    pub fn new(profile_store: Arc<dyn ProfileStorePort>) -> Self {
        Self { profile_store }
    }

    pub async fn handle(
        &self,
        _query: ListProfiles,
    ) -> Result<Vec<VoiceProfile>, ApplicationError> {
        Ok(self.profile_store.list().await?)
    }
}
