pub mod backend_client;
pub mod coingecko_client;
