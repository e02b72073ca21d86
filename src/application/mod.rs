pub mod account;
pub mod market;
pub mod portfolio;
pub mod profile_cache;
pub mod session_store;
pub mod trading;

#[cfg(test)]
pub mod test_support;
