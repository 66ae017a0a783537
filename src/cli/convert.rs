use anyhow::Result;

use super::ui;
use crate::engine;
use crate::rate_provider::RateProvider;
use crate::rates::RateError;

/// Fetches rates for `from` and prints the converted amount.
pub async fn run(provider: &dyn RateProvider, amount: f64, from: &str, to: &str) -> Result<()> {
    let pb = ui::new_spinner(&format!("Fetching rates for {from}..."));
    let outcome = provider.fetch_rates(from).await;
    pb.finish_and_clear();

    let table = outcome?;
    let rate = table.rate(to).ok_or_else(|| RateError::RateUnavailable {
        code: to.to_string(),
    })?;
    let converted = engine::convert_amount(amount, rate);

    println!(
        "{amount:.2} {from} = {} {to}",
        ui::style_text(&format!("{converted:.2}"), ui::StyleType::Value)
    );
    println!(
        "{}",
        ui::style_text(&format!("1 {from} = {rate:.4} {to}"), ui::StyleType::Subtle)
    );
    if let Some(updated) = table.last_updated {
        println!(
            "{}",
            ui::style_text(
                &format!("Rates as of {}", updated.format("%Y-%m-%d %H:%M UTC")),
                ui::StyleType::Subtle
            )
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::RateTable;
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    struct MockRateProvider {
        table: RateTable,
    }

    #[async_trait]
    impl RateProvider for MockRateProvider {
        async fn fetch_rates(&self, _base: &str) -> Result<RateTable, RateError> {
            Ok(self.table.clone())
        }
    }

    #[tokio::test]
    async fn test_convert_succeeds_for_known_target() {
        let provider = MockRateProvider {
            table: RateTable::new("USD", BTreeMap::from([("EUR".to_string(), 1.25)])),
        };
        let result = run(&provider, 10.0, "USD", "EUR").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_convert_fails_for_unknown_target() {
        let provider = MockRateProvider {
            table: RateTable::new("USD", BTreeMap::from([("EUR".to_string(), 1.25)])),
        };
        let result = run(&provider, 10.0, "USD", "XXX").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "no rate available for XXX"
        );
    }
}
