//! CSRF-aware JSON fetch client.
//!
//! # Overview
//! Issues JSON requests that carry the session's CSRF token, normalizes
//! every response into an `Outcome` (parsed data, or a formatted error plus
//! the failing status) and folds batches of outcomes into UI state updates.
//!
//! # Design
//! - `FetchClient` is stateless apart from its configuration; the transport,
//!   cookie store and error formatter are injected capabilities.
//! - Each verb is split into `build_*` (produces a request) and
//!   `parse_response` (consumes a response), so the I/O boundary is
//!   explicit and everything around it is deterministic.
//! - HTTP failure statuses are data, not errors: only transport failures
//!   and unparseable bodies come back as `Err`.
//! - `process_response` and `process_errors` are pure reducers for merging
//!   results of concurrent requests.

pub mod aggregate;
pub mod client;
pub mod config;
pub mod cookies;
pub mod error;
pub mod error_message;
pub mod http;
pub mod outcome;
pub mod transport;

pub use aggregate::{process_errors, process_response, PartialUpdate};
pub use client::FetchClient;
pub use config::ClientConfig;
pub use cookies::{generate_headers, CookieJar, CookieStore};
pub use error::ApiError;
pub use error_message::{DefaultErrorFormatter, ErrorBody, ErrorFormatter, ErrorMessage};
pub use http::{FetchOptions, HttpMethod, HttpRequest, HttpResponse};
pub use outcome::Outcome;
pub use transport::{Transport, UreqTransport};
