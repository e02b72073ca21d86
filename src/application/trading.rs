//! Trade submission

use crate::application::profile_cache::ProfileCoordinator;
use crate::application::session_store::SessionStore;
use crate::domain::entities::transaction::{TradeRequest, TransactionKind, TransactionRecord};
use crate::domain::errors::ClientError;
use crate::domain::repositories::remote_api::TransactionApi;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct TradingService {
    session: Arc<SessionStore>,
    profiles: Arc<ProfileCoordinator>,
    transactions: Arc<dyn TransactionApi>,
}

impl TradingService {
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

    /// Validate and submit a trade for the logged-in user.
    ///
    /// Bad input is rejected before any request is sent. After the backend
    /// accepts the trade, the cached profile is explicitly refreshed; a failed
    /// refresh is logged but does not undo the trade.
    pub async fn submit(
        &self,
        ticker: &str,
        kind: Option<TransactionKind>,
        volume: Decimal,
    ) -> Result<TransactionRecord, ClientError> {
        let username = self
            .session
            .username()
            .await
            .ok_or(ClientError::Unauthenticated)?;

        let trade =
            TradeRequest::new(&username, ticker, kind, volume).map_err(ClientError::Validation)?;

        let record = self
            .transactions
            .create_transaction(&trade)
            .await
            .map_err(|e| {
                error!(username = %username, ticker = %trade.ticker, "Trade rejected: {}", e);
                ClientError::from(e)
            })?;

        info!(
            username = %username,
            ticker = %record.ticker,
            kind = %record.kind,
            volume = %record.volume,
            "Transaction created"
        );

        if let Err(e) = self.profiles.refresh().await {
            warn!(username = %username, "Profile refresh after trade failed: {}", e);
        }

        Ok(record)
    }
}
