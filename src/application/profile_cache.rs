//! Profile cache coordinator
//!
//! Single place that decides whether the cached [`ProfileSnapshot`] can be
//! reused for a requested username or has to be fetched again. The cache has
//! no expiry: it is reused exactly when the usernames are equal, and it is
//! refreshed only on an identity mismatch or an explicit `refresh`/`invalidate`.

use crate::application::session_store::{ProfileStore, SessionStore, SessionTicket};
use crate::domain::entities::profile::ProfileSnapshot;
use crate::domain::errors::{ApiError, ClientError};
use crate::domain::repositories::remote_api::AccountApi;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub struct ProfileCoordinator {
    session: Arc<SessionStore>,
    accounts: Arc<dyn AccountApi>,
}

impl ProfileCoordinator {
    pub fn new(session: Arc<SessionStore>, accounts: Arc<dyn AccountApi>) -> Self {
        Self { session, accounts }
    }

    /// Profile for `username`, served from cache when it belongs to that user
    pub async fn profile(&self, username: &str) -> Result<Arc<ProfileSnapshot>, ClientError> {
        let ticket = self.session.ticket().await;

        if let Some(cached) = self.session.cached_profile().await {
            if cached.belongs_to(username) {
                debug!(username = %username, "Profile cache hit");
                self.session.mark_profile_served(&ticket).await;
                return Ok(cached);
            }
            debug!(
                cached = %cached.username,
                requested = %username,
                "Profile cache holds another user, fetching"
            );
        } else {
            debug!(username = %username, "Profile cache empty, fetching");
        }

        self.fetch_and_store(username, ticket).await
    }

    /// Profile of the logged-in user
    pub async fn current_profile(&self) -> Result<Arc<ProfileSnapshot>, ClientError> {
        let username = self
            .session
            .username()
            .await
            .ok_or(ClientError::Unauthenticated)?;
        self.profile(&username).await
    }

    /// Refetch the logged-in user's profile, bypassing the cache.
    ///
    /// Callers invoke this after a write (e.g. a submitted trade) changed the
    /// balance or holdings server-side.
    pub async fn refresh(&self) -> Result<Arc<ProfileSnapshot>, ClientError> {
        let username = self
            .session
            .username()
            .await
            .ok_or(ClientError::Unauthenticated)?;
        debug!(username = %username, "Explicit profile refresh");
        let ticket = self.session.ticket().await;
        self.fetch_and_store(&username, ticket).await
    }

    /// Drop the cached snapshot without fetching
    pub async fn invalidate(&self) {
        self.session.invalidate_profile().await;
    }

    /// Fetch and offer the result to the cache. Of overlapping requests, the
    /// one issued last decides the cache; an earlier one finishing later
    /// returns that snapshot when it is for the same user.
    async fn fetch_and_store(
        &self,
        username: &str,
        ticket: SessionTicket,
    ) -> Result<Arc<ProfileSnapshot>, ClientError> {
        let profile = match self.accounts.fetch_profile(username).await {
            Ok(profile) => Arc::new(profile),
            Err(e) => {
                error!(username = %username, "Failed to fetch profile: {}", e);
                // A missing profile is not an empty collection: surface it
                return Err(match e {
                    ApiError::NotFound => ClientError::RemoteFailure {
                        message: "User not found".to_string(),
                    },
                    other => other.into(),
                });
            }
        };

        match self.session.store_profile(&ticket, Arc::clone(&profile)).await {
            ProfileStore::Stored => Ok(profile),
            ProfileStore::Newer(latest) => {
                debug!(username = %username, "Later profile fetch already applied, using it");
                Ok(latest)
            }
            ProfileStore::Stale => {
                warn!(username = %username, "Profile fetch outdated, result discarded");
                Err(ClientError::Superseded)
            }
        }
    }
}
