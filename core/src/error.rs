//! Error types for the fetch client.
//!
//! # Design
//! Non-2xx responses are not errors here: they come back as
//! `Outcome::Failure` values. `ApiError` only covers what stops a call from
//! producing an outcome at all: the transport failing, an unparseable body,
//! or a payload that cannot be encoded.

/// Errors returned by `FetchClient` operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The network round-trip itself failed (DNS, refused connection, I/O).
    #[error("transport failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response body was expected to be JSON but did not parse.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A base URL or request URI could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The method does not allow a request body, but one was supplied.
    #[error("{0} request cannot have a body")]
    BodyNotAllowed(&'static str),
}
