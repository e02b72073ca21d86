//! Market snapshot refresh

use crate::domain::errors::ClientError;
use crate::domain::repositories::remote_api::{MarketDataSource, MarketSync};
use crate::domain::services::market_list::MarketList;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct MarketService {
    source: Arc<dyn MarketDataSource>,
    sync: Option<Arc<dyn MarketSync>>,
}

impl MarketService {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source, sync: None }
    }

    /// Also ask the backend to sync its market table after each refresh
    pub fn with_sync(mut self, sync: Arc<dyn MarketSync>) -> Self {
        self.sync = Some(sync);
        self
    }

    /// Fetch a fresh snapshot and swap it into `list`.
    ///
    /// On failure the list keeps its previous snapshot, query and page.
    pub async fn refresh(&self, list: &mut MarketList) -> Result<usize, ClientError> {
        let snapshot = self.source.fetch_snapshot().await.map_err(|e| {
            error!(source = %self.source.name(), "Failed to fetch market snapshot: {}", e);
            ClientError::from(e)
        })?;

        let count = snapshot.len();
        list.replace_snapshot(snapshot);
        info!(
            source = %self.source.name(),
            coins = count,
            matching = list.filtered_len(),
            "Market snapshot refreshed"
        );

        if let Some(sync) = &self.sync {
            if let Err(e) = sync.sync_market().await {
                warn!("Backend market sync failed: {}", e);
            }
        }

        Ok(count)
    }
}
