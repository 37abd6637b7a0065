//! Venue context
//!
//! A [`VenueSession`] is loaded once and never mutated. Switching or
//! refreshing the venue produces a new snapshot which the caller hands to
//! whoever needs it.

use crate::api::PosApi;
use crate::storage::ClientStorage;
use crate::{ClientError, ClientResult};
use shared::client::UserInfo;
use shared::models::Venue;

/// Selected venue + signed-in user
#[derive(Debug, Clone, PartialEq)]
pub struct VenueSession {
    pub venue: Venue,
    /// Every venue the user may switch to
    pub venues: Vec<Venue>,
    pub user: UserInfo,
    /// Unix millis of the load
    pub loaded_at: i64,
}

impl VenueSession {
    /// Load the venue list and pick the persisted venue, or the first one
    pub async fn load(api: &dyn PosApi, storage: &ClientStorage, user: UserInfo) -> ClientResult<Self> {
        let venues = api.list_venues().await?;
        let persisted = storage.active_venue_id();

        let chosen = persisted
            .as_deref()
            .and_then(|id| venues.iter().find(|v| v.id == id))
            .or_else(|| venues.first())
            .ok_or_else(|| ClientError::NotFound("Venue".to_string()))?;

        if persisted.as_deref() != Some(chosen.id.as_str()) {
            tracing::info!(venue_id = %chosen.id, "Persisted venue unavailable, using first venue");
        }

        Self::activate(api, storage, chosen.id.clone(), venues, user).await
    }

    /// New session on another venue of the same list
    pub async fn select(&self, api: &dyn PosApi, storage: &ClientStorage, venue_id: &str) -> ClientResult<Self> {
        if !self.venues.iter().any(|v| v.id == venue_id) {
            return Err(ClientError::NotFound(format!("Venue {}", venue_id)));
        }
        Self::activate(api, storage, venue_id.to_string(), self.venues.clone(), self.user.clone()).await
    }

    /// Reload venue list and detail, keeping the current venue when it still exists
    pub async fn refresh(&self, api: &dyn PosApi, storage: &ClientStorage) -> ClientResult<Self> {
        let venues = api.list_venues().await?;
        let venue_id = if venues.iter().any(|v| v.id == self.venue.id) {
            self.venue.id.clone()
        } else {
            venues
                .first()
                .map(|v| v.id.clone())
                .ok_or_else(|| ClientError::NotFound("Venue".to_string()))?
        };
        Self::activate(api, storage, venue_id, venues, self.user.clone()).await
    }

    async fn activate(
        api: &dyn PosApi,
        storage: &ClientStorage,
        venue_id: String,
        venues: Vec<Venue>,
        user: UserInfo,
    ) -> ClientResult<Self> {
        let venue = api.get_venue(&venue_id).await?;
        storage.set_active_venue(&venue)?;
        tracing::info!(venue_id = %venue.id, venue = %venue.name, user = %user.username, "Venue activated");

        Ok(Self {
            venue,
            venues,
            user,
            loaded_at: shared::util::now_millis(),
        })
    }

    pub fn venue_id(&self) -> &str {
        &self.venue.id
    }
}
