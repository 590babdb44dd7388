//! Runs one test charge through [`cardcharge::StripeGateway`].
//!
//! # Usage
//!
//! ```bash
//! # Charge the sample cardholder 49.99 USD against Stripe test mode
//! CARDCHARGE_SECRET_KEY=sk_test_... cargo run -p cardcharge-cli
//!
//! # Point at a local mock processor
//! cargo run -p cardcharge-cli -- --endpoint http://localhost:12111/v1/charges
//!
//! # Configure logging level
//! RUST_LOG=debug cargo run -p cardcharge-cli
//! ```
//!
//! # Environment Variables
//!
//! - `CARDCHARGE_SECRET_KEY` - Processor secret key (required)
//! - `CARDCHARGE_ENDPOINT` - Charge endpoint (default: Stripe charges API)
//! - `CARDCHARGE_SOURCE_TOKEN` - Payment source token (default: `tok_visa`)
//! - `CARDCHARGE_TIMEOUT_SECS` - Request timeout (default: `30`)
//! - `RUST_LOG` - Log level filter (default: `info`)
//!
//! Variables may also be set in a `.env` file in the working directory.

mod cli;

use cardcharge::{PaymentGateway, StripeGateway};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

#[tokio::main]
async fn main() {
    // Load .env before the filter so RUST_LOG can come from it
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!("Failed to load .env: {e}");
        }
    }

    match run(Args::parse()).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("Charge run failed: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let config = args.gateway_config()?;
    tracing::info!(
        endpoint = %config.endpoint,
        policy = ?config.amount_policy,
        "Loaded configuration"
    );

    let mut gateway = StripeGateway::with_config(args.secret_key.clone(), config);
    fill_cardholder(&mut gateway, &args);

    let success = gateway.charge(args.amount, &args.currency).await;
    report(&gateway, success);
    Ok(success)
}

fn fill_cardholder<G: PaymentGateway>(gateway: &mut G, args: &Args) {
    gateway
        .set_name(args.name.as_str())
        .set_address1(args.address1.as_str())
        .set_address2(args.address2.as_deref())
        .set_city(args.city.as_str())
        .set_province(args.province.as_str())
        .set_postal(args.postal.as_str())
        .set_country(args.country.as_str())
        .set_card_number(args.card_number.as_str())
        .set_expiration_date(args.exp_month.as_str(), args.exp_year.as_str())
        .set_cvv(args.cvv.as_str());
}

#[allow(clippy::print_stdout)]
fn report<G: PaymentGateway>(gateway: &G, success: bool) {
    if success {
        println!(
            "Charge successful! Transaction ID: {}",
            gateway.transaction_id().unwrap_or("<none>")
        );
    } else {
        println!("Charge failed. Errors:");
        for error in gateway.errors() {
            println!("  - {error}");
        }
    }
}
