pub mod ledger_aggregator;
pub mod market_list;
