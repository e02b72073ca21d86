//! Profile snapshot - balance and server-side holdings for one username

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Response of `GET /users/{username}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub id: i64,
    pub username: String,
    pub balance: Decimal,
    #[serde(default)]
    pub holdings: BTreeMap<String, Decimal>,
}

impl ProfileSnapshot {
    /// Whether this snapshot describes `username`
    pub fn belongs_to(&self, username: &str) -> bool {
        self.username == username
    }

    /// Server-side holdings with a positive amount, ordered by ticker
    pub fn positive_holdings(&self) -> Vec<(&str, Decimal)> {
        self.holdings
            .iter()
            .filter(|(_, amount)| **amount > Decimal::ZERO)
            .map(|(ticker, amount)| (ticker.as_str(), *amount))
            .collect()
    }
}

/// Registration form payload for `POST /register`
#[derive(Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub balance: Decimal,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("balance", &self.balance)
            .finish()
    }
}

impl Registration {
    pub fn new(username: &str, password: &str, balance: Decimal) -> Result<Self, String> {
        if username.trim().is_empty() {
            return Err("Username is required".to_string());
        }
        if password.is_empty() {
            return Err("Password is required".to_string());
        }
        if balance <= Decimal::ZERO {
            return Err("Balance must be greater than zero".to_string());
        }
        Ok(Self {
            username: username.trim().to_string(),
            password: password.to_string(),
            balance,
        })
    }
}
