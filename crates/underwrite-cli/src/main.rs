mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::batch::BatchArgs;
use commands::deal::DealArgs;

/// Underwrite rental property deals
#[derive(Parser)]
#[command(
    name = "underwrite",
    version,
    about = "Underwrite rental property deals",
    long_about = "A CLI for underwriting single-property rental deals with decimal \
                  precision. Computes loan sizing, amortized debt service, expense \
                  rollups, NOI, PITI, annual cash flow and cash-on-cash return."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log progress to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Underwrite a single deal and print its metrics
    Deal(DealArgs),
    /// Underwrite a deal with DSCR, cap rate, break-even ratio and warnings
    Analyze(DealArgs),
    /// Print the year-by-year amortization schedule of the deal's loan
    Schedule(DealArgs),
    /// Underwrite every deal in a JSON, YAML or CSV file
    Batch(BatchArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Deal(args) => commands::deal::run_deal(args),
        Commands::Analyze(args) => commands::deal::run_analyze(args),
        Commands::Schedule(args) => commands::deal::run_schedule(args),
        Commands::Batch(args) => commands::batch::run_batch(args),
        Commands::Version => {
            println!("underwrite {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deal_with_flags() {
        let cli = Cli::try_parse_from([
            "underwrite",
            "deal",
            "--purchase-price",
            "250000",
            "--loan-term-years",
            "15",
            "--output",
            "table",
        ])
        .unwrap();
        assert!(matches!(cli.output, OutputFormat::Table));
        match cli.command {
            Commands::Deal(args) => {
                assert_eq!(args.purchase_price.to_string(), "250000");
                assert_eq!(args.loan_term_years, 15);
            }
            _ => panic!("expected deal subcommand"),
        }
    }

    #[test]
    fn test_parse_batch_requires_input() {
        assert!(Cli::try_parse_from(["underwrite", "batch"]).is_err());
        assert!(Cli::try_parse_from(["underwrite", "batch", "--input", "deals.csv"]).is_ok());
    }

    #[test]
    fn test_negative_flag_values_reach_the_engine() {
        let cli = Cli::try_parse_from(["underwrite", "deal", "--monthly-rent", "-5"]).unwrap();
        match cli.command {
            Commands::Deal(args) => assert!(args.monthly_rent.is_sign_negative()),
            _ => panic!("expected deal subcommand"),
        }
    }
}
