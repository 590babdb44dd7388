//! A [`PaymentGateway`] backed by Stripe's `POST /v1/charges`.
//!
//! Each charge is one form-encoded POST authenticated with HTTP Basic (secret
//! key as username, empty password) and bounded by the configured timeout.
//! The body carries only `amount`, `currency` and `source`; cardholder fields
//! stay on the gateway.
//!
//! ## Telemetry
//!
//! With the `telemetry` feature each charge runs inside a
//! `cardcharge.charge` span recording the endpoint, amount, currency and
//! outcome. Card data and the secret key are never recorded.

use reqwest::Client;

use crate::config::GatewayConfig;
use crate::error::ChargeError;
use crate::gateway::{BoxFuture, PaymentGateway};
use crate::request::{ChargeForm, ChargeRequest};
use crate::response::{ChargeOutcome, ChargeReceipt, decode_response};

#[cfg(feature = "telemetry")]
use tracing::{Instrument, Span};

/// Stripe charge gateway.
///
/// Owns the cardholder details, the configuration, and the outcome of the
/// most recent charge. A new charge replaces the previous outcome.
/// [`PaymentGateway::transaction_id`] keeps the identifier of the last
/// successful charge across later failures; [`StripeGateway::last_outcome`]
/// reports strictly per call.
pub struct StripeGateway {
    secret_key: String,
    config: GatewayConfig,
    client: Client,
    request: ChargeRequest,
    outcome: Option<ChargeOutcome>,
    transaction_id: Option<String>,
}

impl StripeGateway {
    /// Creates a gateway with the default configuration.
    #[must_use]
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self::with_config(secret_key, GatewayConfig::default())
    }

    /// Creates a gateway from an explicit configuration.
    ///
    /// Uses the configured reqwest client if one is set, otherwise a new one.
    #[must_use]
    pub fn with_config(secret_key: impl Into<String>, mut config: GatewayConfig) -> Self {
        let client = config.http_client.take().unwrap_or_default();
        Self {
            secret_key: secret_key.into(),
            config,
            client,
            request: ChargeRequest::default(),
            outcome: None,
            transaction_id: None,
        }
    }

    /// Returns the gateway configuration.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Returns the cardholder details set so far.
    #[must_use]
    pub const fn request(&self) -> &ChargeRequest {
        &self.request
    }

    /// Returns the outcome of the most recent charge, or `None` if no charge
    /// has been submitted yet.
    #[must_use]
    pub const fn last_outcome(&self) -> Option<&ChargeOutcome> {
        self.outcome.as_ref()
    }

    async fn charge_inner(&mut self, amount: u64, currency: &str) -> bool {
        self.outcome = None;

        let form = ChargeForm::new(
            self.config.amount_policy,
            amount,
            currency,
            &self.config.source_token,
        );
        let result = self.submit(&form).await;
        record_result_on_span(&result);

        let outcome = match result {
            Ok(receipt) => {
                self.transaction_id.clone_from(&receipt.transaction_id);
                ChargeOutcome::succeeded(receipt.transaction_id)
            }
            Err(err) => ChargeOutcome::failed(&err),
        };
        let success = outcome.success;
        self.outcome = Some(outcome);
        success
    }

    /// Posts `form` and decodes the processor's answer.
    async fn submit(&self, form: &ChargeForm) -> Result<ChargeReceipt, ChargeError> {
        let response = self
            .client
            .post(self.config.endpoint.clone())
            .basic_auth(&self.secret_key, None::<&str>)
            .form(form)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|source| ChargeError::Transport { source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ChargeError::ReadBody { status, source })?;

        decode_response(status, &body, &self.config.transaction_field)
    }
}

impl PaymentGateway for StripeGateway {
    fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.request.name = name.into();
        self
    }

    fn set_address1(&mut self, address: impl Into<String>) -> &mut Self {
        self.request.address_line1 = address.into();
        self
    }

    fn set_address2(&mut self, address: Option<&str>) -> &mut Self {
        self.request.address_line2 = address.map(str::to_owned);
        self
    }

    fn set_city(&mut self, city: impl Into<String>) -> &mut Self {
        self.request.city = city.into();
        self
    }

    fn set_province(&mut self, province: impl Into<String>) -> &mut Self {
        self.request.province = province.into();
        self
    }

    fn set_postal(&mut self, postal: impl Into<String>) -> &mut Self {
        self.request.postal_code = postal.into();
        self
    }

    fn set_country(&mut self, country: impl Into<String>) -> &mut Self {
        self.request.country = country.into();
        self
    }

    fn set_card_number(&mut self, number: impl Into<String>) -> &mut Self {
        self.request.card_number = number.into();
        self
    }

    fn set_expiration_date(
        &mut self,
        month: impl Into<String>,
        year: impl Into<String>,
    ) -> &mut Self {
        self.request.expiration_month = month.into();
        self.request.expiration_year = year.into();
        self
    }

    fn set_cvv(&mut self, cvv: impl Into<String>) -> &mut Self {
        self.request.cvv = cvv.into();
        self
    }

    #[cfg(feature = "telemetry")]
    fn charge<'a>(&'a mut self, amount: u64, currency: &'a str) -> BoxFuture<'a, bool> {
        let span = tracing::info_span!(
            "cardcharge.charge",
            endpoint = %self.config.endpoint,
            amount,
            currency = %currency,
            policy = ?self.config.amount_policy,
            otel.status_code = tracing::field::Empty,
            error.message = tracing::field::Empty,
        );
        Box::pin(with_span(self.charge_inner(amount, currency), span))
    }

    #[cfg(not(feature = "telemetry"))]
    fn charge<'a>(&'a mut self, amount: u64, currency: &'a str) -> BoxFuture<'a, bool> {
        Box::pin(self.charge_inner(amount, currency))
    }

    fn errors(&self) -> &[String] {
        self.outcome
            .as_ref()
            .map(|outcome| outcome.errors.as_slice())
            .unwrap_or_default()
    }

    fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }
}

impl std::fmt::Debug for StripeGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeGateway")
            .field("config", &self.config)
            .field("request", &self.request)
            .field("outcome", &self.outcome)
            .field("transaction_id", &self.transaction_id)
            .finish_non_exhaustive()
    }
}

/// Records the outcome of a charge on the current span.
#[cfg(feature = "telemetry")]
fn record_result_on_span(result: &Result<ChargeReceipt, ChargeError>) {
    let span = Span::current();
    match result {
        Ok(receipt) => {
            span.record("otel.status_code", "OK");
            tracing::debug!(
                status = %receipt.status,
                transaction_id = ?receipt.transaction_id,
                "Charge accepted"
            );
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", tracing::field::display(err));
            tracing::warn!(error = %err, status = ?err.status(), "Charge failed");
        }
    }
}

/// Noop if telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
const fn record_result_on_span(_result: &Result<ChargeReceipt, ChargeError>) {}

/// Instruments a future with a given tracing span.
#[cfg(feature = "telemetry")]
fn with_span<F: std::future::Future>(
    fut: F,
    span: Span,
) -> impl std::future::Future<Output = F::Output> {
    fut.instrument(span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AmountPolicy;
    use std::time::Duration;
    use wiremock::matchers::{basic_auth, body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SECRET: &str = "sk_test_lBzwJ4lQzQvEPZwgl3s59Mal";
    const CHARGES_PATH: &str = "/v1/charges";

    fn gateway_for(server: &MockServer) -> StripeGateway {
        let config = GatewayConfig::new(&format!("{}{CHARGES_PATH}", server.uri())).unwrap();
        StripeGateway::with_config(SECRET, config)
    }

    fn fill_sample_cardholder(gateway: &mut StripeGateway) {
        gateway
            .set_name("Bob Smith")
            .set_address1("123 Test Street")
            .set_address2(Some("Suite #4"))
            .set_city("Morristown")
            .set_province("TN")
            .set_postal("37814")
            .set_country("US")
            .set_card_number("4007000000027")
            .set_expiration_date("10", "2021")
            .set_cvv("123");
    }

    async fn mount_json(server: &MockServer, status: u16, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(CHARGES_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    #[test]
    fn setters_chain_on_same_instance_and_last_write_wins() {
        let mut gateway = StripeGateway::new(SECRET);
        let returned: *const StripeGateway = gateway
            .set_city("Knoxville")
            .set_cvv("999")
            .set_name("Alice")
            .set_city("Morristown")
            .set_address2(Some("Suite #4"))
            .set_address2(None)
            .set_expiration_date("01", "2030")
            .set_expiration_date("10", "2021");
        assert!(std::ptr::eq(returned, &gateway));

        let request = gateway.request();
        assert_eq!(request.city, "Morristown");
        assert_eq!(request.cvv, "999");
        assert_eq!(request.name, "Alice");
        assert_eq!(request.address_line2, None);
        assert_eq!(request.expiration_month, "10");
        assert_eq!(request.expiration_year, "2021");
        assert_eq!(request.card_number, "");
    }

    #[test]
    fn fresh_gateway_has_no_outcome() {
        let gateway = StripeGateway::new(SECRET);
        assert!(gateway.last_outcome().is_none());
        assert!(gateway.errors().is_empty());
        assert_eq!(gateway.transaction_id(), None);
        assert_eq!(gateway.config().endpoint.as_str(), crate::DEFAULT_CHARGES_URL);
    }

    #[test]
    fn debug_hides_secret_key() {
        let gateway = StripeGateway::new(SECRET);
        assert!(!format!("{gateway:?}").contains(SECRET));
    }

    #[tokio::test]
    async fn successful_charge_posts_form_with_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHARGES_PATH))
            .and(basic_auth(SECRET, ""))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("amount=4999&currency=usd&source=tok_visa"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"balance_transaction": "txn_abc123"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut gateway = gateway_for(&server);
        fill_sample_cardholder(&mut gateway);

        assert!(gateway.charge(4999, "USD").await);
        assert_eq!(gateway.transaction_id(), Some("txn_abc123"));
        assert!(gateway.errors().is_empty());

        let outcome = gateway.last_outcome().unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.transaction_id.as_deref(), Some("txn_abc123"));
    }

    #[tokio::test]
    async fn processor_error_keeps_previous_transaction_id() {
        let server = MockServer::start().await;
        mount_json(&server, 200, serde_json::json!({"balance_transaction": "txn_first"})).await;

        let mut gateway = gateway_for(&server);
        fill_sample_cardholder(&mut gateway);
        assert!(gateway.charge_usd(4999).await);

        server.reset().await;
        mount_json(
            &server,
            402,
            serde_json::json!({"error": {"code": "card_declined"}}),
        )
        .await;

        assert!(!gateway.charge(4999, "USD").await);
        assert_eq!(
            gateway.errors(),
            [r#"{"code":"card_declined"}"#.to_owned()]
        );
        assert_eq!(gateway.transaction_id(), Some("txn_first"));
        assert_eq!(gateway.last_outcome().unwrap().transaction_id, None);
    }

    #[tokio::test]
    async fn timeout_is_reported_as_transport_error() {
        let server = MockServer::start().await;
        mount_json(&server, 200, serde_json::json!({"balance_transaction": "txn_first"})).await;

        let config = GatewayConfig::new(&format!("{}{CHARGES_PATH}", server.uri()))
            .unwrap()
            .with_timeout(Duration::from_millis(200));
        let mut gateway = StripeGateway::with_config(SECRET, config);
        assert!(gateway.charge(100, "USD").await);

        server.reset().await;
        Mock::given(method("POST"))
            .and(path(CHARGES_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"balance_transaction": "txn_late"}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        assert!(!gateway.charge(100, "USD").await);
        assert_eq!(gateway.errors().len(), 1);
        assert!(gateway.errors()[0].starts_with("transport error"));
        assert_eq!(gateway.transaction_id(), Some("txn_first"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_reported_as_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = GatewayConfig::new(&format!("http://127.0.0.1:{port}{CHARGES_PATH}")).unwrap();
        let mut gateway = StripeGateway::with_config(SECRET, config);

        assert!(!gateway.charge(4999, "USD").await);
        assert_eq!(gateway.errors().len(), 1);
        assert!(gateway.errors()[0].starts_with("transport error"));
        assert_eq!(gateway.transaction_id(), None);
    }

    #[tokio::test]
    async fn empty_body_fails_with_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHARGES_PATH))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut gateway = gateway_for(&server);
        assert!(!gateway.charge(4999, "USD").await);
        assert_eq!(
            gateway.errors(),
            ["empty response from payment processor (HTTP 200 OK)".to_owned()]
        );
    }

    #[tokio::test]
    async fn malformed_body_fails_without_panicking() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHARGES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let mut gateway = gateway_for(&server);
        assert!(!gateway.charge(4999, "USD").await);
        assert!(gateway.errors()[0].starts_with("invalid response from payment processor"));
    }

    #[tokio::test]
    async fn consecutive_charges_do_not_accumulate_errors() {
        let server = MockServer::start().await;
        mount_json(&server, 402, serde_json::json!({"error": "card_declined"})).await;

        let mut gateway = gateway_for(&server);
        assert!(!gateway.charge(4999, "USD").await);
        assert!(!gateway.charge(4999, "USD").await);
        assert_eq!(gateway.errors(), ["card_declined".to_owned()]);

        server.reset().await;
        mount_json(&server, 200, serde_json::json!({"balance_transaction": "txn_ok"})).await;

        assert!(gateway.charge(4999, "USD").await);
        assert!(gateway.errors().is_empty());
        assert_eq!(gateway.transaction_id(), Some("txn_ok"));
    }

    #[tokio::test]
    async fn success_without_reference_clears_transaction_id() {
        let server = MockServer::start().await;
        mount_json(&server, 200, serde_json::json!({"balance_transaction": "txn_first"})).await;

        let mut gateway = gateway_for(&server);
        assert!(gateway.charge(4999, "USD").await);

        server.reset().await;
        mount_json(&server, 200, serde_json::json!({"id": "ch_pending"})).await;

        assert!(gateway.charge(4999, "USD").await);
        assert_eq!(gateway.transaction_id(), None);
    }

    #[tokio::test]
    async fn legacy_policy_posts_fixed_amount() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHARGES_PATH))
            .and(body_string("amount=2000&currency=usd&source=tok_mastercard"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"balance_transaction": "txn_legacy"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = GatewayConfig::new(&format!("{}{CHARGES_PATH}", server.uri()))
            .unwrap()
            .with_source_token("tok_mastercard")
            .with_amount_policy(AmountPolicy::LegacyFixed);
        let mut gateway = StripeGateway::with_config(SECRET, config);

        assert!(gateway.charge(4999, "EUR").await);
        assert_eq!(gateway.transaction_id(), Some("txn_legacy"));
    }

    #[tokio::test]
    async fn non_success_status_without_error_field_fails() {
        let server = MockServer::start().await;
        mount_json(&server, 503, serde_json::json!({"message": "maintenance"})).await;

        let mut gateway = gateway_for(&server);
        assert!(!gateway.charge(4999, "USD").await);
        assert!(gateway.errors()[0].starts_with("unexpected HTTP status 503"));
    }
}
