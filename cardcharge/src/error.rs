//! Error types for charge submission and gateway configuration.
//!
//! [`ChargeError`] never escapes [`crate::PaymentGateway::charge`]: each
//! failure is rendered through its `Display` impl into the gateway's error
//! list. [`ConfigError`] is returned by configuration constructors.

use reqwest::StatusCode;
use serde_json::Value;

/// Reasons a single charge attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum ChargeError {
    /// DNS, connect, TLS or timeout failure before a response arrived.
    #[error("transport error: {source}")]
    Transport {
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read to completion.
    #[error("failed to read response body (HTTP {status}): {source}")]
    ReadBody {
        /// Status line of the partial response.
        status: StatusCode,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The processor reported an error object; rendered as the raw payload.
    #[error("{}", render_payload(.payload))]
    Processor {
        /// HTTP status the error arrived with.
        status: StatusCode,
        /// The `error` value exactly as the processor sent it.
        payload: Value,
    },

    /// The response carried no body.
    #[error("empty response from payment processor (HTTP {status})")]
    EmptyResponse {
        /// HTTP status of the empty response.
        status: StatusCode,
    },

    /// The body was not a JSON object.
    #[error("invalid response from payment processor (HTTP {status}): {reason}")]
    InvalidResponse {
        /// HTTP status of the response.
        status: StatusCode,
        /// What made the body unusable.
        reason: String,
    },

    /// A non-success status without an `error` field.
    #[error("unexpected HTTP status {status} from payment processor: {body}")]
    UnexpectedStatus {
        /// The HTTP status code.
        status: StatusCode,
        /// The response body.
        body: String,
    },
}

impl ChargeError {
    /// Returns `true` if the failure happened before any response arrived.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns the HTTP status of the response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport { .. } => None,
            Self::ReadBody { status, .. }
            | Self::Processor { status, .. }
            | Self::EmptyResponse { status }
            | Self::InvalidResponse { status, .. }
            | Self::UnexpectedStatus { status, .. } => Some(*status),
        }
    }
}

/// Renders a processor error payload as-is: strings verbatim, anything else
/// as compact JSON.
fn render_payload(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Errors raised while building a [`crate::GatewayConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The charge endpoint is not a valid absolute URL.
    #[error("invalid charge endpoint {input:?}: {source}")]
    InvalidEndpoint {
        /// The rejected input.
        input: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },
}
