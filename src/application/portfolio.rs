//! Portfolio views - ledger fetch, holdings derivation and the overview
//! shown on the portfolio and user pages.

use crate::application::profile_cache::ProfileCoordinator;
use crate::application::session_store::SessionStore;
use crate::domain::entities::holding::HoldingView;
use crate::domain::entities::profile::ProfileSnapshot;
use crate::domain::entities::transaction::TransactionRecord;
use crate::domain::errors::{ApiError, ClientError};
use crate::domain::repositories::remote_api::TransactionApi;
use crate::domain::services::ledger_aggregator;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Number of transactions shown in the "recent" lists
pub const RECENT_TRANSACTIONS: usize = 5;

/// Everything a user page renders
#[derive(Debug, Clone)]
pub struct PortfolioOverview {
    pub profile: Arc<ProfileSnapshot>,
    /// Holdings folded from the ledger
    pub holdings: Vec<HoldingView>,
    pub total_trades: usize,
    /// First transactions of the ledger, in ledger order
    pub recent: Vec<TransactionRecord>,
    /// Whether the ledger has more than `recent` shows
    pub has_more: bool,
}

pub struct PortfolioService {
    session: Arc<SessionStore>,
    profiles: Arc<ProfileCoordinator>,
    transactions: Arc<dyn TransactionApi>,
}

impl PortfolioService {
    pub fn new(
        session: Arc<SessionStore>,
        profiles: Arc<ProfileCoordinator>,
        transactions: Arc<dyn TransactionApi>,
    ) -> Self {
        Self {
            session,
            profiles,
            transactions,
        }
    }

    /// Ledger for `username`; a missing ledger is an empty one
    pub async fn ledger(&self, username: &str) -> Result<Vec<TransactionRecord>, ClientError> {
        let ticket = self.session.ticket().await;
        let ledger = self.fetch_ledger(username).await?;

        if !self.session.is_current(&ticket).await {
            warn!(username = %username, "Session changed while fetching ledger, result discarded");
            return Err(ClientError::Superseded);
        }
        Ok(ledger)
    }

    /// Holdings derived from the ledger of `username`
    pub async fn holdings(&self, username: &str) -> Result<Vec<HoldingView>, ClientError> {
        let ledger = self.ledger(username).await?;
        Ok(ledger_aggregator::aggregate(&ledger))
    }

    /// Overview for `username`. The profile and ledger are fetched concurrently.
    pub async fn overview(&self, username: &str) -> Result<PortfolioOverview, ClientError> {
        let ticket = self.session.ticket().await;

        let (profile, ledger) = tokio::join!(
            self.profiles.profile(username),
            self.fetch_ledger(username)
        );
        let profile = profile?;
        let ledger = ledger?;

        if !self.session.is_current(&ticket).await {
            warn!(username = %username, "Session changed while loading overview, result discarded");
            return Err(ClientError::Superseded);
        }

        let holdings = ledger_aggregator::aggregate(&ledger);
        let total_trades = ledger.len();
        let recent: Vec<TransactionRecord> =
            ledger.into_iter().take(RECENT_TRANSACTIONS).collect();

        Ok(PortfolioOverview {
            profile,
            holdings,
            total_trades,
            recent,
            has_more: total_trades > RECENT_TRANSACTIONS,
        })
    }

    /// Overview for the logged-in user
    pub async fn my_overview(&self) -> Result<PortfolioOverview, ClientError> {
        let username = self
            .session
            .username()
            .await
            .ok_or(ClientError::Unauthenticated)?;
        self.overview(&username).await
    }

    async fn fetch_ledger(&self, username: &str) -> Result<Vec<TransactionRecord>, ClientError> {
        match self.transactions.list_transactions(username).await {
            Ok(ledger) => {
                debug!(username = %username, transactions = ledger.len(), "Ledger fetched");
                Ok(ledger)
            }
            Err(ApiError::NotFound) => {
                debug!(username = %username, "No ledger yet, using empty ledger");
                Ok(Vec::new())
            }
            Err(e) => {
                error!(username = %username, "Failed to fetch ledger: {}", e);
                Err(e.into())
            }
        }
    }
}
