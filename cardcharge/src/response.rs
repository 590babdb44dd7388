//! Interpreting processor responses.

use reqwest::StatusCode;
use serde_json::Value;

use crate::constants::ERROR_FIELD;
use crate::error::ChargeError;

/// Result of one charge attempt.
///
/// A fresh outcome replaces the previous one on every call; outcomes are
/// never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChargeOutcome {
    /// Whether the processor accepted the charge.
    pub success: bool,
    /// Transaction reference returned by this attempt, present only on success.
    pub transaction_id: Option<String>,
    /// Error messages from this attempt, populated only on failure.
    pub errors: Vec<String>,
}

impl ChargeOutcome {
    /// Outcome of an accepted charge.
    #[must_use]
    pub const fn succeeded(transaction_id: Option<String>) -> Self {
        Self {
            success: true,
            transaction_id,
            errors: Vec::new(),
        }
    }

    /// Outcome of a failed charge.
    #[must_use]
    pub fn failed(error: &ChargeError) -> Self {
        Self {
            success: false,
            transaction_id: None,
            errors: vec![error.to_string()],
        }
    }
}

/// What a successfully decoded charge response carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeReceipt {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Transaction reference, if the response carried one.
    pub transaction_id: Option<String>,
}

/// Decodes a charge response body.
///
/// The checks run in order: empty body, JSON object shape, truthy `error`
/// field, success status. The transaction identifier is read from
/// `transaction_field` and must be a string.
///
/// # Errors
///
/// Returns [`ChargeError::EmptyResponse`], [`ChargeError::InvalidResponse`],
/// [`ChargeError::Processor`] or [`ChargeError::UnexpectedStatus`].
pub fn decode_response(
    status: StatusCode,
    body: &str,
    transaction_field: &str,
) -> Result<ChargeReceipt, ChargeError> {
    if body.trim().is_empty() {
        return Err(ChargeError::EmptyResponse { status });
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| ChargeError::InvalidResponse {
            status,
            reason: e.to_string(),
        })?;
    let Value::Object(mut object) = value else {
        return Err(ChargeError::InvalidResponse {
            status,
            reason: "expected a JSON object".to_owned(),
        });
    };

    if let Some(payload) = object.remove(ERROR_FIELD).filter(is_truthy) {
        return Err(ChargeError::Processor { status, payload });
    }

    if !status.is_success() {
        return Err(ChargeError::UnexpectedStatus {
            status,
            body: body.to_owned(),
        });
    }

    let transaction_id = match object.remove(transaction_field) {
        Some(Value::String(id)) => Some(id),
        _ => None,
    };

    Ok(ChargeReceipt {
        status,
        transaction_id,
    })
}

/// `null`, `false` and `""` do not count as an error.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
