pub mod cli;
pub mod config;
pub mod engine;
pub mod log;
pub mod providers;
pub mod rate_provider;
pub mod rates;
pub mod session;

use anyhow::Result;
use tracing::{debug, info};

use crate::engine::DisplayMode;
use crate::providers::caching::CachingRateProvider;
use crate::providers::exchange_rate_api::ExchangeRateApiProvider;

pub enum AppCommand {
    Convert {
        amount: f64,
        from: String,
        to: String,
    },
    Rates {
        base: Option<String>,
        all: bool,
    },
    Currencies {
        base: Option<String>,
    },
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let api_key = config.api_key()?;
    let provider = CachingRateProvider::new(ExchangeRateApiProvider::new(
        &config.provider.base_url,
        &api_key,
    ));

    match command {
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&provider, amount, &from.to_uppercase(), &to.to_uppercase()).await
        }
        AppCommand::Rates { base, all } => {
            let base = base
                .unwrap_or_else(|| config.base_currency.clone())
                .to_uppercase();
            let mode = if all {
                DisplayMode::All
            } else {
                DisplayMode::Common
            };
            cli::rates::run(&provider, &base, mode).await
        }
        AppCommand::Currencies { base } => {
            let base = base
                .unwrap_or_else(|| config.base_currency.clone())
                .to_uppercase();
            cli::currencies::run(&provider, &base).await
        }
        AppCommand::Interactive => cli::interactive::run(&provider, &config).await,
    }
}
