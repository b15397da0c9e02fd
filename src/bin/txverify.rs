use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use txverify::config::load_config;
use txverify::{PaymentVerifier, VerificationRequest, VerifierConfig};

#[derive(Parser)]
#[command(name = "txverify")]
#[command(about = "Verify claimed crypto payments against public ledgers", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Built-in defaults apply without one.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify one claimed payment
    Verify {
        /// Expected amount in currency units
        #[arg(long)]
        amount: Decimal,

        /// Currency as the payer stated it, e.g. ETH or USDT
        #[arg(long)]
        currency: String,

        /// Transaction hash or explorer link
        #[arg(long)]
        reference: Option<String>,

        /// Receiving address, used for fallback discovery
        #[arg(long)]
        address: Option<String>,

        /// Chain hint, e.g. tron or erc20
        #[arg(long)]
        chain: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "txverify=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(2);
            }
        },
        None => VerifierConfig::default(),
    };

    let verifier = match PaymentVerifier::new(&config) {
        Ok(verifier) => verifier,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    match cli.command {
        Commands::Verify {
            amount,
            currency,
            reference,
            address,
            chain,
        } => {
            let request = VerificationRequest {
                reference,
                address,
                amount,
                currency,
                chain_hint: chain,
            };

            let result = match verifier.verify(&request).await {
                Ok(result) => result,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(2);
                }
            };

            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(2);
                }
            }

            if result.verified {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
    }
}
