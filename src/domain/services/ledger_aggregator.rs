//! Ledger aggregation - derives current holdings from a transaction ledger
//!
//! Holdings are never stored client-side. Every ledger fetch is folded from
//! scratch into a fresh set of [`HoldingView`]s.

use crate::domain::entities::holding::HoldingView;
use crate::domain::entities::transaction::{TransactionKind, TransactionRecord};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

/// Fold `ledger` into per-ticker holdings.
///
/// Transactions are applied in the order given. BUY adds its volume and its
/// total `price` to the ticker; SELL subtracts both. Tickers whose final
/// volume is zero or negative are dropped. The remaining holdings keep the
/// order in which their ticker first appeared in the ledger.
pub fn aggregate(ledger: &[TransactionRecord]) -> Vec<HoldingView> {
    let mut holdings: Vec<HoldingView> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for transaction in ledger {
        let slot = *index.entry(transaction.ticker.as_str()).or_insert_with(|| {
            holdings.push(HoldingView::new(&transaction.ticker));
            holdings.len() - 1
        });
        let holding = &mut holdings[slot];

        match transaction.kind {
            TransactionKind::Buy => {
                holding.volume += transaction.volume;
                holding.total_spent += transaction.price;
            }
            TransactionKind::Sell => {
                holding.volume -= transaction.volume;
                holding.total_spent -= transaction.price;
            }
        }
    }

    let tickers_seen = holdings.len();
    holdings.retain(|holding| holding.volume > Decimal::ZERO);

    debug!(
        transactions = ledger.len(),
        tickers_seen,
        holdings = holdings.len(),
        "Aggregated ledger into holdings"
    );

    holdings
}
