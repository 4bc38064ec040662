//! Error types for the patient API client.
//!
//! # Design
//! `NotFound` and `BadRequest` get dedicated variants because the server
//! uses exactly those two statuses for caller mistakes. All other non-2xx
//! responses land in `HttpError` with the raw status code and body.

/// Errors returned by `PatientClient` parse methods.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404: the patient does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned 400, with its explanation.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The server returned a non-success status other than 400 or 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
