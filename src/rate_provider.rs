//! Provides live exchange rate lookup for the application.

use async_trait::async_trait;

use crate::rates::{RateError, RateTable};

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the full rate table for one unit of `base`.
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, RateError>;
}
