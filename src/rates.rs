//! Exchange rate data model shared by providers and the conversion engine.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

/// Failures surfaced by a rate provider. All of them are recoverable at the
/// CLI boundary; the user retries manually.
#[derive(Debug, Error)]
pub enum RateError {
    /// No `From<reqwest::Error>` here on purpose: request URLs carry the
    /// API key, so constructors must scrub via `Error::without_url`.
    #[error("rate service request failed: {0}")]
    Network(reqwest::Error),

    #[error("rate service error: {0}")]
    Api(String),

    #[error("no rate available for {code}")]
    RateUnavailable { code: String },
}

/// Exchange rates for one unit of a base currency.
///
/// A table is replaced wholesale on every fetch; nothing in it survives a
/// base currency change.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl RateTable {
    pub fn new(base: &str, rates: BTreeMap<String, f64>) -> Self {
        RateTable {
            base: base.to_string(),
            rates,
            last_updated: None,
        }
    }

    /// Rate from the base currency into `code`. The base itself always
    /// converts at 1.0, whether or not the provider listed it.
    pub fn rate(&self, code: &str) -> Option<f64> {
        if code == self.base {
            Some(1.0)
        } else {
            self.rates.get(code).copied()
        }
    }

    /// Currency codes known to this table, in code order.
    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }
}
