//! In-process doubles for the remote collaborators, shared by the
//! application-layer tests.

use crate::domain::entities::identity::{Credentials, Identity};
use crate::domain::entities::market::MarketEntry;
use crate::domain::entities::profile::{ProfileSnapshot, Registration};
use crate::domain::entities::transaction::{TradeRequest, TransactionKind, TransactionRecord};
use crate::domain::errors::ApiError;
use crate::domain::repositories::remote_api::{
    AccountApi, ApiResult, MarketDataSource, MarketSync, TransactionApi,
};
use crate::domain::repositories::session_backend::{SessionBackend, SessionBackendError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn identity(username: &str) -> Identity {
    Identity::new(username, &format!("token-{}", username), "bearer").unwrap()
}

pub fn profile(username: &str, balance: Decimal) -> ProfileSnapshot {
    ProfileSnapshot {
        id: 1,
        username: username.to_string(),
        balance,
        holdings: BTreeMap::new(),
    }
}

pub fn record(id: i64, ticker: &str, kind: TransactionKind, volume: Decimal, price: Decimal) -> TransactionRecord {
    TransactionRecord {
        id,
        ticker: ticker.to_string(),
        kind,
        volume,
        price,
        created_time: None,
        username: None,
    }
}

pub fn market_entry(symbol: &str, name: &str) -> MarketEntry {
    MarketEntry {
        id: name.to_lowercase(),
        symbol: symbol.to_string(),
        name: name.to_string(),
        price: Some(1.0),
        change_24h: Some(0.5),
        market_cap: None,
        volume: None,
        image: None,
    }
}

/// Account API double with call counting and an optional gate that holds
/// `fetch_profile` until the test releases it
#[derive(Default)]
pub struct MockAccountApi {
    pub profiles: Mutex<HashMap<String, ProfileSnapshot>>,
    pub fetch_calls: AtomicUsize,
    pub login_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub fail_fetch: AtomicBool,
    pub reject_login: AtomicBool,
    pub gate: Option<Arc<Notify>>,
    pub fetch_started: Arc<Notify>,
    /// Per-username responses, each held until its own gate opens
    pub scripted: Mutex<HashMap<String, VecDeque<(Arc<Notify>, ProfileSnapshot)>>>,
}

impl MockAccountApi {
    pub fn with_profiles(profiles: Vec<ProfileSnapshot>) -> Self {
        let api = Self::default();
        {
            let mut map = api.profiles.lock().unwrap();
            for p in profiles {
                map.insert(p.username.clone(), p);
            }
        }
        api
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Queue a response for the next fetch of `profile.username`; returns the
    /// gate that releases it
    pub fn script(&self, profile: ProfileSnapshot) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.scripted
            .lock()
            .unwrap()
            .entry(profile.username.clone())
            .or_default()
            .push_back((gate.clone(), profile));
        gate
    }

    pub fn set_profile(&self, profile: ProfileSnapshot) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.username.clone(), profile);
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountApi for MockAccountApi {
    async fn register(&self, _registration: &Registration) -> ApiResult<()> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<Identity> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_login.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 401,
                detail: "Invalid credentials".to_string(),
            });
        }
        Ok(identity(&credentials.username))
    }

    async fn fetch_profile(&self, username: &str) -> ApiResult<ProfileSnapshot> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self
            .scripted
            .lock()
            .unwrap()
            .get_mut(username)
            .and_then(VecDeque::pop_front);
        self.fetch_started.notify_one();
        if let Some((gate, profile)) = scripted {
            gate.notified().await;
            return Ok(profile);
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        self.profiles
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                detail: "User not found".to_string(),
            })
    }
}

/// Transaction API double. Users without a ledger answer `NotFound`.
#[derive(Default)]
pub struct MockTransactionApi {
    pub ledgers: Mutex<HashMap<String, Vec<TransactionRecord>>>,
    pub list_error: Mutex<Option<ApiError>>,
    pub create_error: Mutex<Option<ApiError>>,
    pub list_calls: AtomicUsize,
    pub created: Mutex<Vec<TradeRequest>>,
}

impl MockTransactionApi {
    pub fn with_ledger(username: &str, ledger: Vec<TransactionRecord>) -> Self {
        let api = Self::default();
        api.ledgers
            .lock()
            .unwrap()
            .insert(username.to_string(), ledger);
        api
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }
}

#[async_trait]
impl TransactionApi for MockTransactionApi {
    async fn list_transactions(&self, username: &str) -> ApiResult<Vec<TransactionRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.list_error.lock().unwrap().clone() {
            return Err(e);
        }
        self.ledgers
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn create_transaction(&self, trade: &TradeRequest) -> ApiResult<TransactionRecord> {
        if let Some(e) = self.create_error.lock().unwrap().clone() {
            return Err(e);
        }
        let mut created = self.created.lock().unwrap();
        created.push(trade.clone());
        let volume = trade.volume.value();
        Ok(TransactionRecord {
            id: created.len() as i64,
            ticker: trade.ticker.to_string(),
            kind: trade.kind,
            volume,
            price: volume * Decimal::TEN,
            created_time: None,
            username: Some(trade.username.clone()),
        })
    }
}

#[derive(Default)]
pub struct MockMarketSource {
    pub snapshot: Mutex<Vec<MarketEntry>>,
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
}

impl MockMarketSource {
    pub fn with_entries(entries: Vec<MarketEntry>) -> Self {
        let source = Self::default();
        *source.snapshot.lock().unwrap() = entries;
        source
    }
}

#[async_trait]
impl MarketDataSource for MockMarketSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_snapshot(&self) -> ApiResult<Vec<MarketEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 429,
                detail: "Too many requests".to_string(),
            });
        }
        Ok(self.snapshot.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MockMarketSync {
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl MarketSync for MockMarketSync {
    async fn sync_market(&self) -> ApiResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            Err(ApiError::Transport("backend offline".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Session backend whose every operation fails
pub struct FailingBackend;

#[async_trait]
impl SessionBackend for FailingBackend {
    async fn read(&self, _key: &str) -> Result<Option<String>, SessionBackendError> {
        Err(SessionBackendError::Read("disk unavailable".to_string()))
    }

    async fn write(&self, _key: &str, _value: &str) -> Result<(), SessionBackendError> {
        Err(SessionBackendError::Write("disk unavailable".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<(), SessionBackendError> {
        Err(SessionBackendError::Write("disk unavailable".to_string()))
    }
}
