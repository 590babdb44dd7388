//! The payment gateway capability.
//!
//! [`PaymentGateway`] is the surface a caller programs against: fluent
//! setters for cardholder details, a single `charge`, and accessors for the
//! outcome of the most recent charge.

use std::future::Future;
use std::pin::Pin;

use crate::constants::DEFAULT_CURRENCY;

/// Boxed future returned by [`PaymentGateway::charge`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A card-charging gateway that accumulates cardholder details and submits
/// one charge at a time.
///
/// Every setter stores its argument unconditionally and returns the same
/// instance, so calls chain:
///
/// ```rust
/// use cardcharge::{PaymentGateway, StripeGateway};
///
/// let mut gateway = StripeGateway::new("sk_test_123");
/// gateway
///     .set_name("Bob Smith")
///     .set_address1("123 Test Street")
///     .set_address2(Some("Suite #4"))
///     .set_city("Morristown")
///     .set_province("TN")
///     .set_postal("37814")
///     .set_country("US")
///     .set_card_number("4007000000027")
///     .set_expiration_date("10", "2021")
///     .set_cvv("123");
/// assert_eq!(gateway.request().city, "Morristown");
/// ```
pub trait PaymentGateway: Send {
    /// Sets the cardholder's full name.
    fn set_name(&mut self, name: impl Into<String>) -> &mut Self;

    /// Sets billing address line 1.
    fn set_address1(&mut self, address: impl Into<String>) -> &mut Self;

    /// Sets billing address line 2. `None` marks it as not applicable.
    fn set_address2(&mut self, address: Option<&str>) -> &mut Self;

    /// Sets the billing city.
    fn set_city(&mut self, city: impl Into<String>) -> &mut Self;

    /// Sets the billing state or province.
    fn set_province(&mut self, province: impl Into<String>) -> &mut Self;

    /// Sets the billing zip or postal code.
    fn set_postal(&mut self, postal: impl Into<String>) -> &mut Self;

    /// Sets the ISO 3166-1 alpha-2 billing country code.
    fn set_country(&mut self, country: impl Into<String>) -> &mut Self;

    /// Sets the card number.
    fn set_card_number(&mut self, number: impl Into<String>) -> &mut Self;

    /// Sets the expiration month (`MM`) and year (`YYYY`).
    fn set_expiration_date(
        &mut self,
        month: impl Into<String>,
        year: impl Into<String>,
    ) -> &mut Self;

    /// Sets the card security code.
    fn set_cvv(&mut self, cvv: impl Into<String>) -> &mut Self;

    /// Charges the card `amount` units of `currency`'s smallest denomination
    /// (`100` is 1.00 USD).
    ///
    /// Resolves to `true` if the processor accepted the charge. Failures never
    /// surface as errors here; they are recorded and read back through
    /// [`PaymentGateway::errors`].
    fn charge<'a>(&'a mut self, amount: u64, currency: &'a str) -> BoxFuture<'a, bool>;

    /// Charges in [`DEFAULT_CURRENCY`].
    fn charge_usd(&mut self, amount: u64) -> BoxFuture<'_, bool> {
        self.charge(amount, DEFAULT_CURRENCY)
    }

    /// Errors from the most recent charge; empty if it succeeded or no charge
    /// has been made.
    fn errors(&self) -> &[String];

    /// Transaction identifier from the most recent successful charge.
    fn transaction_id(&self) -> Option<&str>;
}
