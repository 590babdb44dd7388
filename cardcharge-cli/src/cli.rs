//! Command-line arguments.
//!
//! Every flag falls back to an environment variable; `main` loads a `.env`
//! file first so those can live next to the binary. Cardholder flags default
//! to Stripe's sample test cardholder.

use std::time::Duration;

use cardcharge::{AmountPolicy, ConfigError, DEFAULT_CURRENCY, GatewayConfig};

/// Run a single test charge against the payment processor.
#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Args {
    /// Processor secret key, sent as the HTTP Basic username.
    #[arg(long, env = "CARDCHARGE_SECRET_KEY", hide_env_values = true)]
    pub(crate) secret_key: String,

    /// Charge endpoint URL.
    #[arg(long, env = "CARDCHARGE_ENDPOINT")]
    pub(crate) endpoint: Option<String>,

    /// Payment source token.
    #[arg(long, env = "CARDCHARGE_SOURCE_TOKEN")]
    pub(crate) source_token: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "CARDCHARGE_TIMEOUT_SECS")]
    pub(crate) timeout_secs: Option<u64>,

    /// Send the fixed 2000/usd body instead of `--amount`/`--currency`.
    #[arg(long)]
    pub(crate) legacy_fixed_amount: bool,

    /// Amount in the currency's smallest unit.
    #[arg(long, default_value_t = 4999)]
    pub(crate) amount: u64,

    /// ISO 4217 currency code.
    #[arg(long, default_value = DEFAULT_CURRENCY)]
    pub(crate) currency: String,

    /// Cardholder's full name.
    #[arg(long, default_value = "Bob Smith")]
    pub(crate) name: String,

    /// Billing address, line 1.
    #[arg(long, default_value = "123 Test Street")]
    pub(crate) address1: String,

    /// Billing address, line 2.
    #[arg(long, default_value = "Suite #4")]
    pub(crate) address2: Option<String>,

    /// Billing city.
    #[arg(long, default_value = "Morristown")]
    pub(crate) city: String,

    /// Billing state or province.
    #[arg(long, default_value = "TN")]
    pub(crate) province: String,

    /// Billing zip or postal code.
    #[arg(long, default_value = "37814")]
    pub(crate) postal: String,

    /// ISO 3166-1 alpha-2 billing country.
    #[arg(long, default_value = "US")]
    pub(crate) country: String,

    /// Card number.
    #[arg(long, default_value = "4007000000027")]
    pub(crate) card_number: String,

    /// Card expiration month, `MM`.
    #[arg(long, default_value = "10")]
    pub(crate) exp_month: String,

    /// Card expiration year, `YYYY`.
    #[arg(long, default_value = "2021")]
    pub(crate) exp_year: String,

    /// Card security code.
    #[arg(long, default_value = "123")]
    pub(crate) cvv: String,
}

impl Args {
    /// Builds the gateway configuration, leaving unset options at their
    /// defaults.
    pub(crate) fn gateway_config(&self) -> Result<GatewayConfig, ConfigError> {
        let mut config = match &self.endpoint {
            Some(endpoint) => GatewayConfig::new(endpoint)?,
            None => GatewayConfig::default(),
        };
        if let Some(token) = &self.source_token {
            config = config.with_source_token(token.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if self.legacy_fixed_amount {
            config = config.with_amount_policy(AmountPolicy::LegacyFixed);
        }
        Ok(config)
    }
}
