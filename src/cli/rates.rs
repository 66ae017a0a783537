use anyhow::Result;
use comfy_table::Cell;

use super::ui;
use crate::engine::{self, DisplayMode, RateRow};
use crate::rate_provider::RateProvider;
use crate::rates::RateTable;

/// Fetches rates for `base` and prints the rate table.
pub async fn run(provider: &dyn RateProvider, base: &str, mode: DisplayMode) -> Result<()> {
    let pb = ui::new_spinner(&format!("Fetching rates for {base}..."));
    let outcome = provider.fetch_rates(base).await;
    pb.finish_and_clear();

    let table = outcome?;
    let rows = engine::select_rates(&table, mode);
    println!("{}", render(&table, &rows, base));

    Ok(())
}

fn render(table: &RateTable, rows: &[RateRow], base: &str) -> String {
    let mut output = format!(
        "1 {} equals\n\n",
        ui::style_text(base, ui::StyleType::Title)
    );

    let mut display = ui::new_styled_table();
    display.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Name"),
        ui::header_cell("Rate"),
    ]);

    for row in rows {
        let rate_cell = match row.rate {
            Some(rate) => ui::rate_cell(rate),
            None => ui::na_cell(),
        };
        display.add_row(vec![
            Cell::new(&row.code),
            Cell::new(row.name.unwrap_or("")),
            rate_cell,
        ]);
    }
    output.push_str(&display.to_string());

    let mut footer = "Source: exchangerate-api.com".to_string();
    if let Some(updated) = table.last_updated {
        footer.push_str(&format!(
            " • Last updated: {}",
            updated.format("%Y-%m-%d %H:%M UTC")
        ));
    }
    output.push_str(&format!(
        "\n{}",
        ui::style_text(&footer, ui::StyleType::Subtle)
    ));

    output
}
