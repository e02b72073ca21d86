//! Register, login and logout flows

use crate::application::profile_cache::ProfileCoordinator;
use crate::application::session_store::SessionStore;
use crate::domain::entities::identity::{Credentials, Identity};
use crate::domain::entities::profile::Registration;
use crate::domain::errors::ClientError;
use crate::domain::repositories::remote_api::AccountApi;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct AccountService {
    session: Arc<SessionStore>,
    accounts: Arc<dyn AccountApi>,
    profiles: Arc<ProfileCoordinator>,
}

impl AccountService {
    pub fn new(
        session: Arc<SessionStore>,
        accounts: Arc<dyn AccountApi>,
        profiles: Arc<ProfileCoordinator>,
    ) -> Self {
        Self {
            session,
            accounts,
            profiles,
        }
    }

    /// Create an account with an opening balance. Does not log in.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        balance: Decimal,
    ) -> Result<(), ClientError> {
        let registration =
            Registration::new(username, password, balance).map_err(ClientError::Validation)?;

        self.accounts.register(&registration).await.map_err(|e| {
            error!(username = %registration.username, "Registration failed: {}", e);
            ClientError::from(e)
        })?;

        info!(username = %registration.username, "Account registered");
        Ok(())
    }

    /// Log in and make the returned identity the current session.
    ///
    /// The profile is loaded right after the session is saved; if that load
    /// fails the login still stands and the next view fetches it again.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, ClientError> {
        let credentials = Credentials::new(username, password).map_err(ClientError::Validation)?;

        let identity = self.accounts.login(&credentials).await.map_err(|e| {
            error!(username = %credentials.username, "Login failed: {}", e);
            ClientError::from(e)
        })?;

        self.session.save(identity.clone()).await?;
        info!(username = %identity.username(), "Logged in");

        if let Err(e) = self.profiles.refresh().await {
            warn!(username = %identity.username(), "Profile load after login failed: {}", e);
        }

        Ok(identity)
    }

    /// Drop the session and its cached profile. Safe to call when logged out.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let username = self.session.username().await;
        self.session.clear().await?;
        match username {
            Some(username) => info!(username = %username, "Logged out"),
            None => info!("Logout without active session"),
        }
        Ok(())
    }
}
