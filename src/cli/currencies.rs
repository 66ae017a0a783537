use anyhow::Result;

use super::ui;
use crate::rate_provider::RateProvider;

const CODES_PER_LINE: usize = 10;

/// Lists every currency code the rate service knows for `base`.
pub async fn run(provider: &dyn RateProvider, base: &str) -> Result<()> {
    let pb = ui::new_spinner(&format!("Fetching rates for {base}..."));
    let outcome = provider.fetch_rates(base).await;
    pb.finish_and_clear();

    let table = outcome?;
    let codes: Vec<&str> = table.currencies().collect();

    println!(
        "{} currencies available (base {}):\n",
        ui::style_text(&codes.len().to_string(), ui::StyleType::Label),
        base
    );
    for chunk in codes.chunks(CODES_PER_LINE) {
        println!("{}", chunk.join("  "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::{RateError, RateTable};
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    struct MockRateProvider;

    #[async_trait]
    impl RateProvider for MockRateProvider {
        async fn fetch_rates(&self, base: &str) -> Result<RateTable, RateError> {
            Ok(RateTable::new(
                base,
                BTreeMap::from([
                    ("EUR".to_string(), 0.9),
                    ("GBP".to_string(), 0.8),
                    ("USD".to_string(), 1.0),
                ]),
            ))
        }
    }

    #[tokio::test]
    async fn test_currencies_listing() {
        let result = run(&MockRateProvider, "USD").await;
        assert!(result.is_ok());
    }
}
