use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::rate_provider::RateProvider;
use crate::rates::{RateError, RateTable};

/// Memoizes successful fetches per base currency for the lifetime of the
/// process. Failures are never cached, so a user retry always reaches the
/// network again.
#[derive(Clone)]
pub struct CachingRateProvider<T: RateProvider> {
    inner: T,
    tables: Arc<Mutex<HashMap<String, RateTable>>>,
}

impl<T: RateProvider> CachingRateProvider<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            tables: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl<T: RateProvider + Send + Sync> RateProvider for CachingRateProvider<T> {
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, RateError> {
        let mut tables = self.tables.lock().await;
        if let Some(table) = tables.get(base) {
            debug!("Cache hit for base: {}", base);
            return Ok(table.clone());
        }
        debug!("Cache miss for base: {}", base);
        let table = self.inner.fetch_rates(base).await?;
        tables.insert(base.to_string(), table.clone());
        Ok(table)
    }
}
