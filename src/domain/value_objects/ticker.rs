use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_TICKER_LEN: usize = 20;

/// Upper-cased asset symbol as the backend stores it (e.g. "BTC", "SUI").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub fn new(value: &str) -> Result<Self, String> {
        let normalized = value.trim().to_uppercase();

        if normalized.is_empty() {
            return Err("Ticker must not be empty".to_string());
        }
        if normalized.len() > MAX_TICKER_LEN {
            return Err(format!(
                "Ticker '{}' is too long (max {} characters)",
                normalized, MAX_TICKER_LEN
            ));
        }
        if !normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
        {
            return Err(format!(
                "Invalid ticker format: '{}' (only alphanumeric, -, _, ., / allowed)",
                normalized
            ));
        }

        Ok(Ticker(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Ticker {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ticker::new(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}
