#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Single-call card charge client for the Stripe charges API.
//!
//! A [`StripeGateway`] accumulates cardholder and billing details through
//! chained setters, then submits exactly one charge per
//! [`PaymentGateway::charge`] call and records the outcome.
//!
//! ```no_run
//! use cardcharge::{PaymentGateway, StripeGateway};
//!
//! # async fn run() {
//! let mut gateway = StripeGateway::new("sk_test_123");
//! gateway
//!     .set_name("Bob Smith")
//!     .set_card_number("4007000000027")
//!     .set_expiration_date("10", "2021")
//!     .set_cvv("123");
//!
//! if gateway.charge(4999, "USD").await {
//!     println!("charged: {:?}", gateway.transaction_id());
//! } else {
//!     println!("failed: {:?}", gateway.errors());
//! }
//! # }
//! ```
//!
//! # Modules
//!
//! - [`constants`] - Endpoint and request defaults
//! - [`config`] - Gateway configuration and the amount policy
//! - [`error`] - Charge and configuration error types
//! - [`gateway`] - The [`PaymentGateway`] capability
//! - [`request`] - Cardholder fields and the form body
//! - [`response`] - Response decoding and charge outcomes
//! - [`stripe`] - The Stripe implementation
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation of each charge

pub mod config;
pub mod constants;
pub mod error;
pub mod gateway;
pub mod request;
pub mod response;
pub mod stripe;

pub use config::{AmountPolicy, GatewayConfig};
pub use constants::{DEFAULT_CHARGES_URL, DEFAULT_CURRENCY, DEFAULT_SOURCE_TOKEN};
pub use error::{ChargeError, ConfigError};
pub use gateway::{BoxFuture, PaymentGateway};
pub use request::ChargeRequest;
pub use response::ChargeOutcome;
pub use stripe::StripeGateway;
