use serde::{Deserialize, Serialize};

/// One row of the market-data snapshot (`/coins/markets`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEntry {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "current_price", default)]
    pub price: Option<f64>,
    #[serde(rename = "price_change_percentage_24h", default)]
    pub change_24h: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(rename = "total_volume", default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
}

impl MarketEntry {
    /// Symbol as shown in tables and used as a trade ticker
    pub fn display_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }

    /// Case-insensitive substring match on name or symbol.
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.symbol.to_lowercase().contains(needle)
    }
}
