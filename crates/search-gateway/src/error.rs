//! Error types for the search gateway.
//!
//! Errors are split by component: [`GatewayError`] for everything the
//! gateway does against the engine, [`ShapeError`] for the pure result
//! shaper. [`Error`] wraps both for callers that chain a search into shaping.
//!
//! Engine-reported failures inside a search response body are *not* errors
//! here; they travel as data and end up in the envelope's `error` field.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// Top-level error for code that uses both the gateway and the shaper.
#[derive(Error, Debug)]
pub enum Error {
    /// Gateway errors
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Result shaping errors
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Errors raised by [`SearchGateway`](crate::gateway::SearchGateway) operations.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The configuration cannot produce a working client.
    #[error("invalid gateway configuration: {message}")]
    InvalidConfig { message: String },

    /// Bulk indexing was called without any documents.
    #[error(
        "no documents: an empty document list was passed to add_docs for index '{index}'"
    )]
    NoDocuments { index: String },

    /// A record has neither an explicit id nor a usable value in its id field.
    #[error("missing document id: record has no usable '{field}' field")]
    MissingDocumentId { field: String },

    /// The request never produced an HTTP response.
    #[error("transport failure during {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: elasticsearch::Error,
    },

    /// The engine answered with a non-success status.
    #[error("{operation} failed with status {status}: {body}")]
    Response {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// The engine's response body could not be decoded.
    #[error("failed to decode {operation} response: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },
}

impl GatewayError {
    /// Returns the HTTP status carried by a [`GatewayError::Response`].
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for failures raised before any request was sent.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            GatewayError::NoDocuments { .. }
                | GatewayError::MissingDocumentId { .. }
                | GatewayError::InvalidConfig { .. }
        )
    }
}

/// Errors raised by the result shaper.
#[derive(Error, Debug)]
pub enum ShapeError {
    /// A response without `error` does not follow the success schema.
    #[error("malformed search response: {message}")]
    MalformedResponse { message: String },
}

impl From<serde_json::Error> for ShapeError {
    fn from(e: serde_json::Error) -> Self {
        ShapeError::MalformedResponse {
            message: e.to_string(),
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Result type for result shaping.
pub type ShapeResult<T> = Result<T, ShapeError>;
