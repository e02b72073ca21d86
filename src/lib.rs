//! Coinfolio Client Library
//!
//! Client-side state for a crypto trading/portfolio app: session identity and
//! profile cache, holdings derived from the transaction ledger, and a
//! filtered, paginated view over the market snapshot.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod persistence;
