use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xrate::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for xrate::AppCommand {
    fn from(cmd: Commands) -> xrate::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => {
                xrate::AppCommand::Convert { amount, from, to }
            }
            Commands::Rates { base, all } => xrate::AppCommand::Rates { base, all },
            Commands::Currencies { base } => xrate::AppCommand::Currencies { base },
            Commands::Interactive => xrate::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert, zero or more
        #[arg(value_parser = parse_amount)]
        amount: f64,
        /// Source currency code, e.g. USD
        from: String,
        /// Target currency code, e.g. EUR
        to: String,
    },
    /// Display exchange rates for a base currency
    Rates {
        /// Base currency code (defaults to the configured one)
        #[arg(short, long)]
        base: Option<String>,
        /// Show every currency instead of the common subset
        #[arg(short, long)]
        all: bool,
    },
    /// List the currency codes known to the rate service
    Currencies {
        /// Base currency code (defaults to the configured one)
        #[arg(short, long)]
        base: Option<String>,
    },
    /// Start an interactive conversion session
    Interactive,
}

fn parse_amount(value: &str) -> Result<f64, String> {
    let amount: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err("amount must be a finite number, zero or more".to_string());
    }
    Ok(amount)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xrate::cli::setup::setup(),
        Some(cmd) => xrate::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
