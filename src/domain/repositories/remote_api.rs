//! Remote API traits
//!
//! The account, transaction and market-data services are external
//! collaborators. The orchestration layer only talks to them through these
//! traits so the HTTP clients can be swapped for in-process mocks in tests.

use crate::domain::entities::identity::{Credentials, Identity};
use crate::domain::entities::market::MarketEntry;
use crate::domain::entities::profile::{ProfileSnapshot, Registration};
use crate::domain::entities::transaction::{TradeRequest, TransactionRecord};
use crate::domain::errors::ApiError;
use async_trait::async_trait;

/// Common result type for remote calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Account API: registration, login and profile lookup
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// `POST /register`
    async fn register(&self, registration: &Registration) -> ApiResult<()>;

    /// `POST /login`, returning the identity to persist
    async fn login(&self, credentials: &Credentials) -> ApiResult<Identity>;

    /// `GET /users/{username}`
    async fn fetch_profile(&self, username: &str) -> ApiResult<ProfileSnapshot>;
}

/// Transaction API: ledger reads and trade submission
#[async_trait]
pub trait TransactionApi: Send + Sync {
    /// `GET /transactions/{username}`, in the order the backend stores them
    async fn list_transactions(&self, username: &str) -> ApiResult<Vec<TransactionRecord>>;

    /// `POST /transactions`
    async fn create_transaction(&self, trade: &TradeRequest) -> ApiResult<TransactionRecord>;
}

/// Bulk market-data provider
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// One atomic snapshot of the market list
    async fn fetch_snapshot(&self) -> ApiResult<Vec<MarketEntry>>;
}

/// Best-effort hook asking the backend to refresh its own copy of the
/// market list after the client pulled a snapshot
#[async_trait]
pub trait MarketSync: Send + Sync {
    async fn sync_market(&self) -> ApiResult<()>;
}
