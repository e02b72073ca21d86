//! Session store - authenticated identity plus the cached profile snapshot
//!
//! The store is created once at process start with [`SessionStore::init`] and
//! shared as `Arc<SessionStore>` by every view. `save` and `clear` are the only
//! operations that change the identity. Both replace the persisted record wholesale,
//! so readers see either a full session or no session at all.

use crate::domain::entities::identity::Identity;
use crate::domain::entities::profile::ProfileSnapshot;
use crate::domain::errors::ClientError;
use crate::domain::repositories::session_backend::{SessionBackend, SESSION_KEY};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

#[derive(Default)]
struct SessionState {
    identity: Option<Identity>,
    profile: Option<Arc<ProfileSnapshot>>,
    /// Bumped by every `save`/`clear`
    generation: u64,
    /// Sequence of the request that last decided the cached profile
    profile_seq: u64,
}

/// Result of offering a fetched profile to the cache
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ProfileStore {
    Stored,
    /// A later request already decided the cache; it holds this snapshot
    /// for the same username
    Newer(Arc<ProfileSnapshot>),
    /// The session changed, or a later request settled on another user
    Stale,
}

/// Session state captured when a fetch starts.
///
/// A result may only be applied while the ticket is still current, so that a
/// response arriving after logout (or after another login) is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTicket {
    generation: u64,
    /// Unique per ticket, increasing in issue order
    seq: u64,
    username: Option<String>,
}

impl SessionTicket {
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    state: RwLock<SessionState>,
    next_seq: AtomicU64,
}

impl SessionStore {
    /// Create the store and restore any persisted session
    pub async fn init(backend: Arc<dyn SessionBackend>) -> Self {
        let store = Self {
            backend,
            state: RwLock::new(SessionState::default()),
            next_seq: AtomicU64::new(0),
        };

        let restored = store.load().await;
        match &restored {
            Some(identity) => info!(username = %identity.username(), "Session restored"),
            None => debug!("No persisted session"),
        }
        store.state.write().await.identity = restored;

        store
    }

    /// Read the persisted identity.
    ///
    /// Missing, unreadable or malformed records all count as "no session".
    pub async fn load(&self) -> Option<Identity> {
        let raw = match self.backend.read(SESSION_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!("Failed to read session record, treating as absent: {}", e);
                return None;
            }
        };

        let identity: Identity = match serde_json::from_str(&raw) {
            Ok(identity) => identity,
            Err(e) => {
                warn!("Discarding malformed session record: {}", e);
                return None;
            }
        };

        if let Err(reason) = identity.validate() {
            warn!("Discarding incomplete session record: {}", reason);
            return None;
        }

        Some(identity)
    }

    /// Persist `identity` and make it the current session.
    ///
    /// On a persistence failure the previous session stays in place.
    pub async fn save(&self, identity: Identity) -> Result<(), ClientError> {
        identity.validate().map_err(ClientError::Validation)?;
        let record = serde_json::to_string(&identity)
            .map_err(|e| ClientError::Persistence(format!("Failed to serialize session: {}", e)))?;

        // Held across the write so overlapping saves cannot interleave
        let mut state = self.state.write().await;

        self.backend
            .write(SESSION_KEY, &record)
            .await
            .map_err(|e| ClientError::Persistence(e.to_string()))?;

        let keep_profile = state
            .profile
            .as_ref()
            .map(|p| p.belongs_to(identity.username()))
            .unwrap_or(false);
        if !keep_profile {
            state.profile = None;
        }

        info!(username = %identity.username(), "Session saved");
        state.identity = Some(identity);
        state.generation += 1;

        Ok(())
    }

    /// Drop the session and the cached profile. Idempotent.
    ///
    /// In-memory state is cleared even if removing the persisted record fails.
    /// The failure is logged and returned: the record is still on disk, so the
    /// session comes back on the next `init` unless a later `clear` succeeds.
    pub async fn clear(&self) -> Result<(), ClientError> {
        let mut state = self.state.write().await;

        if let Some(identity) = state.identity.as_ref() {
            info!(username = %identity.username(), "Session cleared");
        }
        state.identity = None;
        state.profile = None;
        state.generation += 1;

        self.backend.remove(SESSION_KEY).await.map_err(|e| {
            error!("Failed to remove session record, it will be restored on restart: {}", e);
            ClientError::Persistence(e.to_string())
        })
    }

    pub async fn identity(&self) -> Option<Identity> {
        self.state.read().await.identity.clone()
    }

    pub async fn username(&self) -> Option<String> {
        self.state
            .read()
            .await
            .identity
            .as_ref()
            .map(|identity| identity.username().to_string())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.identity.is_some()
    }

    /// `Authorization` header value for the current session, if any
    pub async fn authorization_header(&self) -> Option<String> {
        self.state
            .read()
            .await
            .identity
            .as_ref()
            .map(Identity::authorization_header)
    }

    pub async fn cached_profile(&self) -> Option<Arc<ProfileSnapshot>> {
        self.state.read().await.profile.clone()
    }

    pub async fn ticket(&self) -> SessionTicket {
        let state = self.state.read().await;
        SessionTicket {
            generation: state.generation,
            seq: self.next_seq.fetch_add(1, Ordering::SeqCst) + 1,
            username: state
                .identity
                .as_ref()
                .map(|identity| identity.username().to_string()),
        }
    }

    pub async fn is_current(&self, ticket: &SessionTicket) -> bool {
        self.state.read().await.generation == ticket.generation
    }

    /// Replace the cached profile if `ticket` is still current and no later
    /// request has decided the cache in the meantime.
    pub(crate) async fn store_profile(
        &self,
        ticket: &SessionTicket,
        profile: Arc<ProfileSnapshot>,
    ) -> ProfileStore {
        let mut state = self.state.write().await;
        if state.generation != ticket.generation {
            return ProfileStore::Stale;
        }
        if ticket.seq < state.profile_seq {
            return match &state.profile {
                Some(cached) if cached.belongs_to(&profile.username) => {
                    ProfileStore::Newer(Arc::clone(cached))
                }
                _ => ProfileStore::Stale,
            };
        }
        debug!(username = %profile.username, seq = ticket.seq, "Profile cache replaced");
        state.profile_seq = ticket.seq;
        state.profile = Some(profile);
        ProfileStore::Stored
    }

    /// Record that the request holding `ticket` was answered from the cache,
    /// so fetches issued before it can no longer replace the snapshot
    pub(crate) async fn mark_profile_served(&self, ticket: &SessionTicket) {
        let mut state = self.state.write().await;
        if state.generation == ticket.generation {
            state.profile_seq = state.profile_seq.max(ticket.seq);
        }
    }

    /// Drop the cached profile; fetches already in flight may not restore it
    pub(crate) async fn invalidate_profile(&self) {
        let mut state = self.state.write().await;
        state.profile_seq = state.profile_seq.max(self.next_seq.load(Ordering::SeqCst));
        if state.profile.take().is_some() {
            debug!("Profile cache invalidated");
        }
    }
}
