//! Lookup errors and their JSON wire form.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DOMAIN_INVALID: &str = "domain parameter invalid";
pub const FORMAT_INVALID: &str = "format parameter invalid";
pub const UPSTREAM_FAILED: &str = "unable to retrieve WHOIS info for domain";

/// Everything that can stop a lookup short of a success response.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Malformed or missing `domain`, or unsupported `format`.
    #[error("{0}")]
    InvalidInput(&'static str),

    /// The provider answered with a non-success status.
    #[error("{}", UPSTREAM_FAILED)]
    Upstream,

    /// Transport failure, body read failure or undecodable body.
    #[error("Error: {0}")]
    Unexpected(String),
}

impl LookupError {
    pub fn status(&self) -> StatusCode {
        match self {
            LookupError::InvalidInput(_) | LookupError::Upstream => StatusCode::BAD_REQUEST,
            LookupError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body carried by every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub msg: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ErrorBody {
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            msg: msg.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

impl From<crate::whois::client::FetchError> for LookupError {
    fn from(err: crate::whois::client::FetchError) -> Self {
        LookupError::Unexpected(err.to_string())
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Unexpected(err.to_string())
    }
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody::new(status, self.to_string());

        // Serializing three plain fields cannot fail.
        let json = serde_json::to_string(&body).unwrap_or_default();

        (
            status,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
            ],
            json,
        )
            .into_response()
    }
}
