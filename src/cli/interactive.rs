use anyhow::Result;
use comfy_table::Cell;
use std::io::Write as _;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::ui;
use crate::config::AppConfig;
use crate::engine::DisplayMode;
use crate::rate_provider::RateProvider;
use crate::session::{FetchRequest, Session, SessionState};

enum Outcome {
    Continue,
    Fetch(FetchRequest),
    Quit,
}

/// Runs the interactive conversion session: one prompt loop driving the
/// session state machine, one fetch at a time.
pub async fn run(provider: &dyn RateProvider, config: &AppConfig) -> Result<()> {
    let mut session = Session::new(&config.base_currency, &config.target_currency);

    print_help();
    let request = session.start();
    perform_fetch(&mut session, request, provider).await;
    render(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match handle_line(&mut session, &line) {
            Outcome::Quit => break,
            Outcome::Fetch(request) => {
                perform_fetch(&mut session, request, provider).await;
                render(&session);
            }
            Outcome::Continue => render(&session),
        }
    }

    Ok(())
}

async fn perform_fetch(session: &mut Session, request: FetchRequest, provider: &dyn RateProvider) {
    let pb = ui::new_spinner(&format!("Fetching rates for {}...", request.base));
    let outcome = provider.fetch_rates(&request.base).await;
    pb.finish_and_clear();
    session.complete(&request, outcome);
}

fn handle_line(session: &mut Session, line: &str) -> Outcome {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or("");
    let argument = parts.next();

    match (command, argument) {
        ("", _) => Outcome::Continue,
        ("quit", _) | ("exit", _) => Outcome::Quit,
        ("help", _) => {
            print_help();
            Outcome::Continue
        }
        ("amount", None) => {
            session.set_amount(None);
            Outcome::Continue
        }
        ("amount", Some(value)) => {
            match value.parse::<f64>() {
                Ok(amount) if amount.is_finite() && amount >= 0.0 => {
                    session.set_amount(Some(amount))
                }
                _ => println!("Amount must be a number, zero or more."),
            }
            Outcome::Continue
        }
        ("from", Some(code)) => Outcome::Fetch(session.set_base(&code.to_uppercase())),
        ("to", Some(code)) => Outcome::Fetch(session.set_target(&code.to_uppercase())),
        ("mode", Some("common")) => {
            session.set_mode(DisplayMode::Common);
            Outcome::Continue
        }
        ("mode", Some("all")) => {
            session.set_mode(DisplayMode::All);
            Outcome::Continue
        }
        ("table", _) => {
            print_table(session);
            Outcome::Continue
        }
        ("retry", _) => match session.state() {
            SessionState::Error(_) => Outcome::Fetch(session.retry()),
            _ => {
                println!("Nothing to retry.");
                Outcome::Continue
            }
        },
        _ => {
            println!("Unknown command; type `help` for the command list.");
            Outcome::Continue
        }
    }
}

fn render(session: &Session) {
    match session.state() {
        SessionState::Idle | SessionState::Loading => {
            println!("Loading exchange rates...");
        }
        SessionState::Error(message) => {
            println!("{}", ui::style_text(message, ui::StyleType::Error));
            println!(
                "{}",
                ui::style_text("Type `retry` to try again.", ui::StyleType::Subtle)
            );
        }
        SessionState::Ready(_) => match (session.amount(), session.result()) {
            (Some(amount), Some(result)) => {
                println!(
                    "{amount} {} = {} {}",
                    session.base(),
                    ui::style_text(&format!("{result:.2}"), ui::StyleType::Value),
                    session.target()
                );
            }
            (Some(_), None) => {
                println!(
                    "{}",
                    ui::style_text(
                        &format!("No rate available for {}", session.target()),
                        ui::StyleType::Error
                    )
                );
            }
            (None, _) => {
                println!(
                    "{}",
                    ui::style_text(
                        "Enter an amount to convert, e.g. `amount 10`.",
                        ui::StyleType::Subtle
                    )
                );
            }
        },
    }
}

fn print_table(session: &Session) {
    let Some(rows) = session.table_rows() else {
        println!("Rates are not loaded yet.");
        return;
    };

    println!(
        "1 {} equals",
        ui::style_text(session.base(), ui::StyleType::Title)
    );
    let mut display = ui::new_styled_table();
    display.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Name"),
        ui::header_cell("Rate"),
    ]);
    for row in &rows {
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
    println!("{display}");
}

fn print_help() {
    println!(
        "Commands: amount <n> | from <code> | to <code> | mode common|all | table | retry | quit"
    );
}
