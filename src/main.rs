use coinfolio::application::portfolio::PortfolioService;
use coinfolio::application::profile_cache::ProfileCoordinator;
use coinfolio::application::market::MarketService;
use coinfolio::application::session_store::SessionStore;
use coinfolio::config::ClientConfig;
use coinfolio::domain::services::market_list::MarketList;
use coinfolio::infrastructure::backend_client::BackendClient;
use coinfolio::infrastructure::coingecko_client::CoinGeckoClient;
use coinfolio::persistence::init_database;
use coinfolio::persistence::session_repository::SqliteSessionBackend;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coinfolio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env();
    config.validate()?;
    info!(
        api = %config.api_base_url,
        market = %config.market_base_url,
        "Configuration loaded"
    );

    let pool = init_database(&config.database_url).await?;
    let session = Arc::new(SessionStore::init(Arc::new(SqliteSessionBackend::new(pool))).await);

    let backend = Arc::new(
        BackendClient::new(&config.api_base_url, config.request_timeout(), session.clone())?
            .with_vs_currency(&config.vs_currency),
    );
    let coingecko = Arc::new(CoinGeckoClient::new(
        &config.market_base_url,
        &config.vs_currency,
        config.market_per_page,
        config.request_timeout(),
    )?);

    let mut market = MarketService::new(coingecko);
    if config.backend_sync {
        market = market.with_sync(backend.clone());
    }

    let page_size = NonZeroUsize::new(config.page_size).unwrap_or(NonZeroUsize::MIN);
    let mut list = MarketList::new(page_size);

    match market.refresh(&mut list).await {
        Ok(count) => {
            if let Ok(query) = std::env::var("COINFOLIO_QUERY") {
                list.set_query(&query);
            }
            if let Some(page) = std::env::var("COINFOLIO_PAGE")
                .ok()
                .and_then(|p| p.parse::<usize>().ok())
            {
                if !list.go_to_page(page) {
                    warn!("Page {} out of range, staying on page {}", page, list.page());
                }
            }

            info!("Market snapshot: {} coins", count);
            for row in list.visible() {
                info!(
                    "#{:<4} {:<8} {:<24} price={} 24h={}",
                    row.rank,
                    row.entry.display_symbol(),
                    row.entry.name,
                    row.entry
                        .price
                        .map(|p| format!("{:.4}", p))
                        .unwrap_or_else(|| "-".to_string()),
                    row.entry
                        .change_24h
                        .map(|c| format!("{:+.2}%", c))
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
            info!("{} pages {:?}", list.summary(), list.page_window());
        }
        Err(e) => error!("Market data unavailable: {}", e),
    }

    let Some(username) = session.username().await else {
        info!("No active session, log in to see your portfolio");
        return Ok(());
    };

    let profiles = Arc::new(ProfileCoordinator::new(session.clone(), backend.clone()));
    let portfolio = PortfolioService::new(session.clone(), profiles, backend);

    match portfolio.overview(&username).await {
        Ok(overview) => {
            info!(
                username = %overview.profile.username,
                balance = %overview.profile.balance,
                trades = overview.total_trades,
                "Portfolio loaded"
            );
            for holding in &overview.holdings {
                let avg_price = holding
                    .avg_price()
                    .map(|p| p.round_dp(2).to_string())
                    .unwrap_or_else(|| "-".to_string());
                info!(
                    ticker = %holding.ticker,
                    volume = %holding.volume,
                    total_spent = %holding.total_spent,
                    avg_price = %avg_price,
                    "Holding"
                );
            }
            for tx in &overview.recent {
                info!(
                    id = tx.id,
                    ticker = %tx.ticker,
                    kind = %tx.kind,
                    volume = %tx.volume,
                    price = %tx.price,
                    "Recent transaction"
                );
            }
            if overview.has_more {
                info!("... and {} more", overview.total_trades - overview.recent.len());
            }
        }
        Err(e) if e.is_user_visible() => error!("Failed to load portfolio: {}", e),
        Err(_) => {}
    }

    Ok(())
}
