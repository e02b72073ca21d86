use rust_decimal::Decimal;
use serde::Serialize;

/// Per-ticker position derived from a ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingView {
    pub ticker: String,
    pub volume: Decimal,
    pub total_spent: Decimal,
}

impl HoldingView {
    pub fn new(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            volume: Decimal::ZERO,
            total_spent: Decimal::ZERO,
        }
    }

    /// Average cost per unit; `None` when no units are held
    pub fn avg_price(&self) -> Option<Decimal> {
        if self.volume.is_zero() {
            None
        } else {
            self.total_spent.checked_div(self.volume)
        }
    }
}
