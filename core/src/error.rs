//! Error types for the CRM API client.
//!
//! # Design
//! `Validation` is raised while a document is being built, before any
//! request exists. `NotFound` gets a dedicated variant because callers
//! frequently distinguish "the record does not exist" from "the server
//! returned an unexpected status." All other non-2xx responses land in
//! `HttpError` with the raw status code and body, unmodified.

use thiserror::Error;

/// Errors returned by the mapper, the `CrmClient` parse methods and the
/// `CrmService` workflows.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field or relationship is missing, or a value cannot be
    /// normalized into its wire form.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// A create was refused locally because the name is already in use.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    pub(crate) fn missing(field: &str) -> Self {
        ApiError::Validation(format!("{field} is required"))
    }
}
