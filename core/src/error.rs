//! Error types for the Tool Tracker API client.
//!
//! # Design
//! `NotFound` gets its own variant since callers often treat a missing tool
//! or user differently from other failures. Any other non-2xx response lands
//! in `HttpError` with the backend's `error` message when it sent one. The
//! list views only ever show the `Display` string.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// The request never produced a response (connection refused, DNS, ...).
    #[error("request failed: {0}")]
    TransportError(String),

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}
