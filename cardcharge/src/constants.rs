//! Processor endpoints and request defaults.

use std::time::Duration;

/// Stripe charge creation endpoint.
pub const DEFAULT_CHARGES_URL: &str = "https://api.stripe.com/v1/charges";

/// Stripe test-mode token for a Visa card, sent as the charge `source`.
pub const DEFAULT_SOURCE_TOKEN: &str = "tok_visa";

/// Currency used by [`crate::PaymentGateway::charge_usd`].
pub const DEFAULT_CURRENCY: &str = "USD";

/// Upper bound on a single charge round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Response field holding the processor's transaction reference.
pub const DEFAULT_TRANSACTION_FIELD: &str = "balance_transaction";

/// Response field whose truthy value marks a failed charge.
pub const ERROR_FIELD: &str = "error";

/// Amount sent under [`crate::AmountPolicy::LegacyFixed`].
pub const LEGACY_FIXED_AMOUNT: u64 = 2000;

/// Currency sent under [`crate::AmountPolicy::LegacyFixed`].
pub const LEGACY_FIXED_CURRENCY: &str = "usd";
