//! Gateway configuration.
//!
//! The charge endpoint, payment source token and request timeout live on
//! [`GatewayConfig`] rather than in globals, so tests and callers can point a
//! gateway anywhere.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use cardcharge::{AmountPolicy, GatewayConfig};
//!
//! let config = GatewayConfig::new("http://127.0.0.1:12111/v1/charges")?
//!     .with_source_token("tok_mastercard")
//!     .with_timeout(Duration::from_secs(5))
//!     .with_amount_policy(AmountPolicy::Forward);
//! # Ok::<(), cardcharge::ConfigError>(())
//! ```

use std::time::Duration;

use serde::{Deserialize, Deserializer};
use url::Url;

use crate::constants::{
    DEFAULT_CHARGES_URL, DEFAULT_SOURCE_TOKEN, DEFAULT_TIMEOUT, DEFAULT_TRANSACTION_FIELD,
    LEGACY_FIXED_AMOUNT, LEGACY_FIXED_CURRENCY,
};
use crate::error::ConfigError;

/// Decides which amount and currency end up in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountPolicy {
    /// Send the caller's amount and currency (currency lowercased).
    #[default]
    Forward,
    /// Ignore the caller's arguments and always send `2000` / `usd`.
    LegacyFixed,
}

impl AmountPolicy {
    /// Returns the `(amount, currency)` pair to put on the wire.
    #[must_use]
    pub fn resolve(self, amount: u64, currency: &str) -> (u64, String) {
        match self {
            Self::Forward => (amount, currency.to_ascii_lowercase()),
            Self::LegacyFixed => (LEGACY_FIXED_AMOUNT, LEGACY_FIXED_CURRENCY.to_owned()),
        }
    }
}

/// Configuration for [`crate::StripeGateway`].
///
/// Deserializable with every field optional; `timeout_secs` maps to
/// [`GatewayConfig::timeout`].
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Charge endpoint the form body is posted to.
    pub endpoint: Url,

    /// Payment source token sent as `source`.
    pub source_token: String,

    /// Bound on the whole request, connect through body.
    #[serde(rename = "timeout_secs", deserialize_with = "deserialize_secs")]
    pub timeout: Duration,

    /// How `charge` arguments map onto the request body.
    pub amount_policy: AmountPolicy,

    /// Response field read as the transaction identifier on success.
    pub transaction_field: String,

    /// Optional pre-configured reqwest client. If `None`, a default client
    /// is created.
    #[serde(skip)]
    pub http_client: Option<reqwest::Client>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_CHARGES_URL).expect("valid default charge URL"),
            source_token: DEFAULT_SOURCE_TOKEN.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            amount_policy: AmountPolicy::default(),
            transaction_field: DEFAULT_TRANSACTION_FIELD.to_owned(),
            http_client: None,
        }
    }
}

impl GatewayConfig {
    /// Creates a config that posts charges to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] if `endpoint` is not an
    /// absolute URL.
    pub fn new(endpoint: &str) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(endpoint).map_err(|source| ConfigError::InvalidEndpoint {
            input: endpoint.to_owned(),
            source,
        })?;
        Ok(Self::default().with_endpoint(endpoint))
    }

    /// Sets the charge endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Sets the payment source token.
    #[must_use]
    pub fn with_source_token(mut self, token: impl Into<String>) -> Self {
        self.source_token = token.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the amount policy.
    #[must_use]
    pub const fn with_amount_policy(mut self, policy: AmountPolicy) -> Self {
        self.amount_policy = policy;
        self
    }

    /// Sets the response field read as the transaction identifier.
    #[must_use]
    pub fn with_transaction_field(mut self, field: impl Into<String>) -> Self {
        self.transaction_field = field.into();
        self
    }

    /// Sets a pre-configured reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("source_token", &self.source_token)
            .field("timeout", &self.timeout)
            .field("amount_policy", &self.amount_policy)
            .field("transaction_field", &self.transaction_field)
            .field("has_http_client", &self.http_client.is_some())
            .finish()
    }
}

fn deserialize_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}
