//! Response construction.
//!
//! # Responsibilities
//! - Build the CORS preflight answer
//! - Wrap successful lookup payloads with content type and CORS origin
//!
//! Error responses are produced by `LookupError`'s `IntoResponse` impl.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::whois::OutputFormat;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "*";
pub const MAX_AGE: &str = "86400";

/// Empty 200 answer to an `OPTIONS` request.
pub fn preflight() -> Response {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN)),
            (header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS)),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS)),
            (header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE)),
        ],
    )
        .into_response()
}

/// 200 carrying a lookup result in the requested representation.
pub fn payload(format: OutputFormat, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(format.content_type())),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN)),
        ],
        body,
    )
        .into_response()
}
