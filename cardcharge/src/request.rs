//! Cardholder state and the charge request body.

use serde::Serialize;

use crate::config::AmountPolicy;

/// Cardholder and billing details accumulated by a gateway before a charge.
///
/// Fields are stored exactly as given; no format checks happen here.
/// `Debug` masks the card number down to its last four characters and hides
/// the security code.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ChargeRequest {
    /// Cardholder's full name.
    pub name: String,
    /// Billing address, line 1.
    pub address_line1: String,
    /// Billing address, line 2. `None` when not applicable.
    pub address_line2: Option<String>,
    /// Billing city.
    pub city: String,
    /// Billing state or province.
    pub province: String,
    /// Billing zip or postal code.
    pub postal_code: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    /// Card number.
    pub card_number: String,
    /// Card security code (CVV, CVV2, ...).
    pub cvv: String,
    /// Expiration month, `MM`.
    pub expiration_month: String,
    /// Expiration year, `YYYY`.
    pub expiration_year: String,
}

impl std::fmt::Debug for ChargeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChargeRequest")
            .field("name", &self.name)
            .field("address_line1", &self.address_line1)
            .field("address_line2", &self.address_line2)
            .field("city", &self.city)
            .field("province", &self.province)
            .field("postal_code", &self.postal_code)
            .field("country", &self.country)
            .field("card_number", &mask_card_number(&self.card_number))
            .field("cvv", &"***")
            .field("expiration_month", &self.expiration_month)
            .field("expiration_year", &self.expiration_year)
            .finish()
    }
}

fn mask_card_number(number: &str) -> String {
    let chars: Vec<char> = number.chars().collect();
    let visible = chars.len().min(4);
    let masked = chars.len() - visible;
    let tail: String = chars[masked..].iter().collect();
    format!("{}{tail}", "*".repeat(masked))
}

/// Form-encoded body posted to the charge endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChargeForm {
    /// Amount in the currency's smallest unit.
    pub amount: u64,
    /// Lowercase ISO 4217 currency code.
    pub currency: String,
    /// Payment source token.
    pub source: String,
}

impl ChargeForm {
    /// Builds the body for one charge attempt under the given policy.
    #[must_use]
    pub fn new(policy: AmountPolicy, amount: u64, currency: &str, source: &str) -> Self {
        let (amount, currency) = policy.resolve(amount, currency);
        Self {
            amount,
            currency,
            source: source.to_owned(),
        }
    }
}
