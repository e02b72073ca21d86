//! HTTP client for the account/transaction backend

use crate::application::session_store::SessionStore;
use crate::domain::entities::identity::{Credentials, Identity};
use crate::domain::entities::profile::{ProfileSnapshot, Registration};
use crate::domain::entities::transaction::{TradeRequest, TransactionRecord};
use crate::domain::errors::ApiError;
use crate::domain::repositories::remote_api::{AccountApi, ApiResult, MarketSync, TransactionApi};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Wire shape of a successful `POST /login`
#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
struct LoginResponse {
    access_token: String,
    token_type: String,
    username: String,
}

/// Backend client. The bearer token is read from the session store on every
/// request, so a login or logout takes effect on the next call.
pub struct BackendClient {
    client: Client,
    base_url: Url,
    vs_currency: String,
    session: Arc<SessionStore>,
}

impl BackendClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session: Arc<SessionStore>,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Transport(format!("Invalid backend URL {}: {}", base_url, e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("coinfolio/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            vs_currency: "usd".to_string(),
            session,
        })
    }

    /// Quote currency passed to the market sync endpoint
    pub fn with_vs_currency(mut self, vs_currency: &str) -> Self {
        self.vs_currency = vs_currency.to_string();
        self
    }

    /// Build `{base}/seg/seg...`, escaping each segment
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        build_endpoint(&self.base_url, segments)
    }

    async fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.authorization_header().await {
            Some(header) => request.header(reqwest::header::AUTHORIZATION, header),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, fallback: &str) -> ApiResult<Response> {
        let response = self.authorized(request).await.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!("Backend returned {}: {}", status, body);
        Err(ApiError::Status {
            status: status.as_u16(),
            detail: error_detail(&body).unwrap_or_else(|| fallback.to_string()),
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> ApiResult<T> {
        let response = self.send(request, fallback).await?;
        Ok(response.json::<T>().await?)
    }
}

fn build_endpoint(base: &Url, segments: &[&str]) -> ApiResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::Transport(format!("Backend URL cannot be a base: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Extract the human-readable message from a FastAPI error body.
///
/// `detail` is either a string or a list of validation errors whose `msg`
/// fields are joined with ", ".
pub fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join(", "))
            }
        }
        _ => None,
    }
}

#[async_trait]
impl AccountApi for BackendClient {
    async fn register(&self, registration: &Registration) -> ApiResult<()> {
        let url = self.endpoint(&["register"])?;
        self.send(self.client.post(url).json(registration), "Registration failed")
            .await?;
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<Identity> {
        let url = self.endpoint(&["login"])?;
        let body = json!({
            "username": credentials.username,
            "password": credentials.password,
        });
        let response: LoginResponse = self
            .send_json(self.client.post(url).json(&body), "Login failed")
            .await?;

        Identity::new(
            &response.username,
            &response.access_token,
            &response.token_type,
        )
        .map_err(ApiError::Decode)
    }

    async fn fetch_profile(&self, username: &str) -> ApiResult<ProfileSnapshot> {
        let url = self.endpoint(&["users", username])?;
        self.send_json(self.client.get(url), "Failed to fetch user details")
            .await
    }
}

#[async_trait]
impl TransactionApi for BackendClient {
    async fn list_transactions(&self, username: &str) -> ApiResult<Vec<TransactionRecord>> {
        let url = self.endpoint(&["transactions", username])?;
        match self
            .send_json(self.client.get(url), "Error fetching transactions")
            .await
        {
            Err(ApiError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(ApiError::NotFound)
            }
            other => other,
        }
    }

    async fn create_transaction(&self, trade: &TradeRequest) -> ApiResult<TransactionRecord> {
        let url = self.endpoint(&["transactions"])?;
        let body = json!({
            "username": trade.username,
            "ticker": trade.ticker.as_str(),
            "transaction_type": trade.kind.to_string(),
            "transaction_volume": trade.volume.value(),
        });
        self.send_json(self.client.post(url).json(&body), "Error creating transaction")
            .await
    }
}

#[async_trait]
impl MarketSync for BackendClient {
    async fn sync_market(&self) -> ApiResult<()> {
        let mut url = self.endpoint(&["api", "crypto", "top20"])?;
        url.query_pairs_mut()
            .append_pair("vs_currency", &self.vs_currency)
            .append_pair("sync", "true");
        self.send(self.client.get(url), "Market sync failed").await?;
        Ok(())
    }
}
