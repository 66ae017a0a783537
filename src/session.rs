//! Explicit converter session state.
//!
//! All transient UI state lives in one place with well defined transitions
//! (idle -> loading -> ready/error) instead of scattered mutable fields.
//! Every fetch carries the generation and base currency it was issued for,
//! and a completion is applied only if both still match the session, so a
//! late response for an abandoned selection never overwrites newer state.

use tracing::debug;

use crate::engine::{self, DisplayMode, RateRow};
use crate::rates::{RateError, RateTable};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Loading,
    Ready(RateTable),
    Error(String),
}

/// Ticket for one in-flight rate fetch. Only the session can mint these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub base: String,
    generation: u64,
}

pub struct Session {
    base: String,
    target: String,
    amount: Option<f64>,
    mode: DisplayMode,
    state: SessionState,
    generation: u64,
    result: Option<f64>,
}

impl Session {
    pub fn new(base: &str, target: &str) -> Self {
        Session {
            base: base.to_string(),
            target: target.to_string(),
            amount: None,
            mode: DisplayMode::Common,
            state: SessionState::Idle,
            generation: 0,
            result: None,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Converted amount for the current inputs, already rounded for
    /// display. `None` while there is no amount, no rate, or no table.
    pub fn result(&self) -> Option<f64> {
        self.result
    }

    /// Issues the initial fetch for the configured base currency.
    pub fn start(&mut self) -> FetchRequest {
        self.state = SessionState::Loading;
        self.recompute();
        self.issue()
    }

    /// Changes the base currency. The old table is rates for a different
    /// base, so it is dropped and a fresh fetch is issued.
    pub fn set_base(&mut self, base: &str) -> FetchRequest {
        self.base = base.to_string();
        self.state = SessionState::Loading;
        self.recompute();
        self.issue()
    }

    /// Changes the target currency. The displayed result updates
    /// immediately from the table already in hand; the returned request
    /// refreshes the table in the background.
    pub fn set_target(&mut self, target: &str) -> FetchRequest {
        self.target = target.to_string();
        self.recompute();
        self.issue()
    }

    /// Changes the entered amount. Purely local: the rate is already in
    /// the table, so no fetch is needed.
    pub fn set_amount(&mut self, amount: Option<f64>) {
        self.amount = amount;
        self.recompute();
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    /// Reissues the fetch for the current base after a failure.
    pub fn retry(&mut self) -> FetchRequest {
        self.state = SessionState::Loading;
        self.recompute();
        self.issue()
    }

    /// Applies a fetch outcome. Stale completions, where the session has
    /// since issued a newer request or moved to another base, are
    /// discarded.
    pub fn complete(&mut self, request: &FetchRequest, outcome: Result<RateTable, RateError>) {
        if request.generation != self.generation || request.base != self.base {
            debug!(base = %request.base, "Discarding stale rate fetch");
            return;
        }
        self.state = match outcome {
            Ok(table) => SessionState::Ready(table),
            Err(e) => SessionState::Error(e.to_string()),
        };
        self.recompute();
    }

    /// Rows for the rate table in the current display mode, once ready.
    pub fn table_rows(&self) -> Option<Vec<RateRow>> {
        match &self.state {
            SessionState::Ready(table) => Some(engine::select_rates(table, self.mode)),
            _ => None,
        }
    }

    fn issue(&mut self) -> FetchRequest {
        self.generation += 1;
        FetchRequest {
            base: self.base.clone(),
            generation: self.generation,
        }
    }

    fn recompute(&mut self) {
        self.result = match &self.state {
            SessionState::Ready(table) => engine::convert(self.amount, table.rate(&self.target)),
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn usd_table() -> RateTable {
        RateTable::new(
            "USD",
            BTreeMap::from([("EUR".to_string(), 1.25), ("GBP".to_string(), 0.791)]),
        )
    }

    fn eur_table() -> RateTable {
        RateTable::new(
            "EUR",
            BTreeMap::from([("USD".to_string(), 0.8), ("GBP".to_string(), 0.6328)]),
        )
    }

    #[test]
    fn test_start_moves_to_loading() {
        let mut session = Session::new("USD", "EUR");
        assert_eq!(*session.state(), SessionState::Idle);

        let request = session.start();
        assert_eq!(request.base, "USD");
        assert_eq!(*session.state(), SessionState::Loading);
        assert_eq!(session.result(), None);
    }

    #[test]
    fn test_successful_fetch_becomes_ready_and_converts() {
        let mut session = Session::new("USD", "EUR");
        session.set_amount(Some(10.0));

        let request = session.start();
        session.complete(&request, Ok(usd_table()));

        assert!(matches!(session.state(), SessionState::Ready(_)));
        assert_eq!(session.result(), Some(12.5));
        assert_eq!(format!("{:.2}", session.result().unwrap()), "12.50");
    }

    #[test]
    fn test_failed_fetch_becomes_error_and_retry_reissues() {
        let mut session = Session::new("USD", "EUR");
        let request = session.start();
        session.complete(
            &request,
            Err(RateError::Api("service reported 'error'".to_string())),
        );

        match session.state() {
            SessionState::Error(message) => {
                assert!(message.contains("service reported 'error'"))
            }
            other => panic!("expected error state, got {other:?}"),
        }
        assert_eq!(session.result(), None);

        let retry = session.retry();
        assert_eq!(*session.state(), SessionState::Loading);
        session.complete(&retry, Ok(usd_table()));
        assert!(matches!(session.state(), SessionState::Ready(_)));
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let mut session = Session::new("USD", "EUR");
        let first = session.start();
        let second = session.set_base("EUR");

        // The older response arrives after the newer request was issued.
        session.complete(&first, Ok(usd_table()));
        assert_eq!(*session.state(), SessionState::Loading);

        session.complete(&second, Ok(eur_table()));
        match session.state() {
            SessionState::Ready(table) => assert_eq!(table.base, "EUR"),
            other => panic!("expected ready state, got {other:?}"),
        }
    }

    #[test]
    fn test_completion_for_another_base_is_discarded() {
        let mut session = Session::new("USD", "EUR");
        let request = session.start();
        session.base = "EUR".to_string();

        session.complete(&request, Ok(usd_table()));
        assert_eq!(*session.state(), SessionState::Loading);
    }

    #[test]
    fn test_amount_change_recomputes_without_fetch() {
        let mut session = Session::new("USD", "EUR");
        let request = session.start();
        session.complete(&request, Ok(usd_table()));

        session.set_amount(Some(4.0));
        assert_eq!(session.result(), Some(5.0));

        session.set_amount(None);
        assert_eq!(session.result(), None);

        // Still ready on the same table; no fetch happened in between.
        assert!(matches!(session.state(), SessionState::Ready(_)));
    }

    #[test]
    fn test_target_change_recomputes_immediately() {
        let mut session = Session::new("USD", "EUR");
        session.set_amount(Some(10.0));
        let request = session.start();
        session.complete(&request, Ok(usd_table()));
        assert_eq!(session.result(), Some(12.5));

        let refresh = session.set_target("GBP");
        assert_eq!(refresh.base, "USD");
        // Result updated from the held table before the refresh lands.
        assert_eq!(session.result(), Some(7.91));
        assert!(matches!(session.state(), SessionState::Ready(_)));
    }

    #[test]
    fn test_target_equal_to_base_converts_at_identity() {
        let mut session = Session::new("USD", "EUR");
        session.set_amount(Some(42.0));
        let request = session.start();
        session.complete(&request, Ok(usd_table()));

        session.set_target("USD");
        assert_eq!(session.result(), Some(42.0));
    }

    #[test]
    fn test_unknown_target_has_no_result() {
        let mut session = Session::new("USD", "XXX");
        session.set_amount(Some(10.0));
        let request = session.start();
        session.complete(&request, Ok(usd_table()));

        assert!(matches!(session.state(), SessionState::Ready(_)));
        assert_eq!(session.result(), None);
    }

    #[test]
    fn test_table_rows_follow_display_mode() {
        let mut session = Session::new("USD", "EUR");
        let request = session.start();
        session.complete(&request, Ok(usd_table()));

        let common = session.table_rows().unwrap();
        assert_eq!(common.len(), engine::COMMON_CURRENCIES.len() - 1);

        session.set_mode(DisplayMode::All);
        let all = session.table_rows().unwrap();
        assert_eq!(all.len(), 2);
    }
}
