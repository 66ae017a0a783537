use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use crate::rate_provider::RateProvider;
use crate::rates::{RateError, RateTable};

/// Client for the exchangerate-api.com `latest/{BASE}` endpoint.
///
/// The API key is supplied by configuration and is part of the request
/// path, so errors are reported by base currency rather than by URL.
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct LatestRatesResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    conversion_rates: Option<BTreeMap<String, f64>>,
    time_last_update_unix: Option<i64>,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(
        name = "LatestRatesFetch",
        skip(self),
        fields(base = %base)
    )]
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, RateError> {
        let url = format!("{}/v6/{}/latest/{}", self.base_url, self.api_key, base);
        debug!("Requesting latest rates for base {base}");

        let client = reqwest::Client::builder()
            .user_agent("xrate/0.1")
            .build()
            .map_err(RateError::Network)?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| RateError::Network(e.without_url()))?;

        if !response.status().is_success() {
            return Err(RateError::Api(format!(
                "HTTP error {} for base {base}",
                response.status()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| RateError::Network(e.without_url()))?;

        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| RateError::Api(format!("unexpected payload for base {base}: {e}")))?;

        if data.result != "success" {
            let reason = data.error_type.unwrap_or_else(|| "unknown".to_string());
            return Err(RateError::Api(format!(
                "service reported '{reason}' for base {base}"
            )));
        }

        let rates = data
            .conversion_rates
            .ok_or_else(|| RateError::Api(format!("missing conversion_rates for base {base}")))?;

        let last_updated = data
            .time_last_update_unix
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single());

        debug!("Received {} rates for base {base}", rates.len());

        Ok(RateTable {
            base: base.to_string(),
            rates,
            last_updated,
        })
    }
}
