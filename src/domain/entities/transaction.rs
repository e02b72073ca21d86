use crate::domain::value_objects::{Ticker, Volume};
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Buy,
    Sell,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Buy => write!(f, "BUY"),
            TransactionKind::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(TransactionKind::Buy),
            "SELL" => Ok(TransactionKind::Sell),
            other => Err(format!("Transaction type must be BUY or SELL, got '{}'", other)),
        }
    }
}

impl Serialize for TransactionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TransactionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One row of `GET /transactions/{username}`.
///
/// `price` is the total amount of the transaction (unit price × volume at
/// execution time), not a per-unit rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: i64,
    pub ticker: String,
    #[serde(rename = "transaction_type")]
    pub kind: TransactionKind,
    #[serde(rename = "transaction_volume")]
    pub volume: Decimal,
    #[serde(rename = "transaction_price")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub username: Option<String>,
}

impl TransactionRecord {
    /// Derived per-unit price (`price / volume`), for display only
    pub fn unit_price(&self) -> Option<Decimal> {
        if self.volume.is_zero() {
            None
        } else {
            self.price.checked_div(self.volume)
        }
    }
}

/// Accepts RFC 3339 timestamps as well as the naive ISO-8601 form the
/// backend emits for timezone-less columns. Unparseable values become `None`.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| parse_timestamp(&value)))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// Validated trade ready to be posted to `POST /transactions`
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRequest {
    pub username: String,
    pub ticker: Ticker,
    pub kind: TransactionKind,
    pub volume: Volume,
}

impl TradeRequest {
    /// Build a trade from raw form input.
    ///
    /// `kind` is optional because an unselected type is a validation
    /// failure, not a parse failure.
    pub fn new(
        username: &str,
        ticker: &str,
        kind: Option<TransactionKind>,
        volume: Decimal,
    ) -> Result<Self, String> {
        if username.trim().is_empty() {
            return Err("Username is required".to_string());
        }
        let ticker = Ticker::new(ticker)?;
        let kind = kind.ok_or_else(|| "Transaction type is required".to_string())?;
        let volume = Volume::new(volume)?;

        Ok(Self {
            username: username.to_string(),
            ticker,
            kind,
            volume,
        })
    }
}
