pub mod holding;
pub mod identity;
pub mod market;
pub mod profile;
pub mod transaction;
