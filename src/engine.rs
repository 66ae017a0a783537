//! Pure conversion and rate table selection logic.

use crate::rates::RateTable;

/// Curated currencies shown in the default rate table, in display order.
pub const COMMON_CURRENCIES: [(&str, &str); 10] = [
    ("USD", "US Dollar"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("JPY", "Japanese Yen"),
    ("CAD", "Canadian Dollar"),
    ("AUD", "Australian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CNY", "Chinese Yuan"),
    ("INR", "Indian Rupee"),
    ("BRL", "Brazilian Real"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Common,
    All,
}

/// One row of the rate table. A missing rate means the provider did not
/// list the currency for the current base; it is shown, not omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRow {
    pub code: String,
    pub name: Option<&'static str>,
    pub rate: Option<f64>,
}

/// Friendly name for a curated currency code.
pub fn currency_name(code: &str) -> Option<&'static str> {
    COMMON_CURRENCIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

pub fn round_display(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Converts `amount` units at `rate`, rounded to 2 decimal places.
pub fn convert_amount(amount: f64, rate: f64) -> f64 {
    round_display(amount * rate, 2)
}

/// Optional form of [`convert_amount`]: `None` amount (no input yet) or
/// `None` rate (currency unavailable) yields no result. Rounding and
/// assignment happen in one step; callers never see an unrounded value.
pub fn convert(amount: Option<f64>, rate: Option<f64>) -> Option<f64> {
    match (amount, rate) {
        (Some(amount), Some(rate)) => Some(convert_amount(amount, rate)),
        _ => None,
    }
}

/// Selects the rows to display for `table`, excluding the base currency.
///
/// `Common` keeps the curated order and reports missing rates as
/// unavailable. `All` walks the table in its natural code order. Rates are
/// rounded to 4 decimal places for display in both modes.
pub fn select_rates(table: &RateTable, mode: DisplayMode) -> Vec<RateRow> {
    match mode {
        DisplayMode::Common => COMMON_CURRENCIES
            .iter()
            .filter(|(code, _)| *code != table.base)
            .map(|(code, name)| RateRow {
                code: (*code).to_string(),
                name: Some(*name),
                rate: table.rates.get(*code).map(|r| round_display(*r, 4)),
            })
            .collect(),
        DisplayMode::All => table
            .rates
            .iter()
            .filter(|(code, _)| **code != table.base)
            .map(|(code, rate)| RateRow {
                code: code.clone(),
                name: currency_name(code),
                rate: Some(round_display(*rate, 4)),
            })
            .collect(),
    }
}
