//! Request builder, executor and response classifier.
//!
//! # Design
//! `FetchClient` holds only immutable configuration plus three injected
//! capabilities: a `Transport` for I/O, a `CookieStore` for the CSRF token
//! and an `ErrorFormatter` for failed responses. Each verb is split the same
//! way: a pure `build_*` producing an `HttpRequest`, a transport round-trip,
//! and a pure `parse_response` producing an `Outcome`. Callers who run their
//! own I/O can use the build/parse halves directly.

use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::cookies::{generate_headers, CookieStore};
use crate::error::ApiError;
use crate::error_message::{DefaultErrorFormatter, ErrorBody, ErrorFormatter};
use crate::http::{FetchOptions, HttpMethod, HttpRequest, HttpResponse, APPLICATION_JSON};
use crate::outcome::Outcome;
use crate::transport::Transport;

/// JSON client that attaches CSRF headers and normalizes responses into
/// `Outcome` values.
///
/// HTTP failure statuses never produce `Err`; only transport failures,
/// malformed JSON bodies and unserializable payloads do.
#[derive(Debug, Clone)]
pub struct FetchClient<T, C, F = DefaultErrorFormatter> {
    config: ClientConfig,
    transport: T,
    cookies: C,
    formatter: F,
}

impl<T, C> FetchClient<T, C> {
    pub fn new(config: ClientConfig, transport: T, cookies: C) -> Self {
        Self {
            config,
            transport,
            cookies,
            formatter: DefaultErrorFormatter,
        }
    }
}

impl<T, C, F> FetchClient<T, C, F> {
    /// Replace the error formatter, changing the message type of outcomes.
    pub fn with_formatter<G>(self, formatter: G) -> FetchClient<T, C, G> {
        FetchClient {
            config: self.config,
            transport: self.transport,
            cookies: self.cookies,
            formatter,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl<T, C, F> FetchClient<T, C, F>
where
    T: Transport,
    C: CookieStore,
    F: ErrorFormatter,
{
    // -- building ----------------------------------------------------------

    /// Resolve `uri` and attach `options`. A `GET` carrying a body is
    /// rejected here instead of being sent without it.
    pub fn build_request(&self, uri: &str, options: FetchOptions) -> Result<HttpRequest, ApiError> {
        if options.method == HttpMethod::Get && options.body.is_some() {
            return Err(ApiError::BodyNotAllowed(HttpMethod::Get.as_str()));
        }
        Ok(HttpRequest {
            method: options.method,
            url: self.config.resolve(uri)?,
            headers: options.headers,
            body: options.body,
        })
    }

    /// A plain `GET` with no generated headers.
    pub fn build_get(&self, uri: &str) -> Result<HttpRequest, ApiError> {
        self.build_request(uri, FetchOptions::default())
    }

    pub fn build_create<D: Serialize + ?Sized>(
        &self,
        uri: &str,
        data: &D,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(uri, self.json_options(HttpMethod::Post, Some(encode(data)?)))
    }

    pub fn build_update<D: Serialize + ?Sized>(
        &self,
        uri: &str,
        data: &D,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(uri, self.json_options(HttpMethod::Put, Some(encode(data)?)))
    }

    pub fn build_destroy(&self, uri: &str) -> Result<HttpRequest, ApiError> {
        self.build_request(uri, self.json_options(HttpMethod::Delete, None))
    }

    pub fn build_destroy_many<D: Serialize + ?Sized>(
        &self,
        uri: &str,
        data: &D,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(uri, self.json_options(HttpMethod::Delete, Some(encode(data)?)))
    }

    fn json_options(&self, method: HttpMethod, body: Option<String>) -> FetchOptions {
        FetchOptions {
            method,
            headers: generate_headers(&self.cookies, &self.config),
            body,
        }
    }

    // -- parsing -----------------------------------------------------------

    /// Classify a raw response into an `Outcome`.
    ///
    /// A failed response whose `content-type` is present, non-empty and not
    /// exactly `application/json` is not parsed: its message is built from
    /// `"<status>: <statusText>"`. Every other response body is parsed as
    /// JSON, including failures that declare no content type at all.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Outcome<F::Message>, ApiError> {
        let failure_status = (!response.is_ok()).then_some(response.status);

        if let Some(status) = failure_status {
            let declared = response.content_type().filter(|ct| !ct.is_empty());
            if let Some(content_type) = declared.filter(|ct| *ct != APPLICATION_JSON) {
                log::debug!("status {status} with {content_type} body, skipping JSON parse");
                let line = format!("{status}: {}", response.status_text);
                return Ok(Outcome::Failure {
                    status,
                    error: self.formatter.format(ErrorBody::StatusLine(line), status),
                });
            }
        }

        let data: Value = serde_json::from_str(&response.body).map_err(ApiError::Deserialization)?;

        Ok(match failure_status {
            None => Outcome::Success(data),
            Some(status) => Outcome::Failure {
                status,
                error: self.formatter.format(ErrorBody::Json(data), status),
            },
        })
    }

    // -- executing ---------------------------------------------------------

    /// Issue one request and classify its response. Never retries.
    pub fn fetch_json(
        &self,
        uri: &str,
        options: FetchOptions,
    ) -> Result<Outcome<F::Message>, ApiError> {
        let request = self.build_request(uri, options)?;
        self.execute(&request)
    }

    /// Run an already built request through the transport.
    pub fn execute(&self, request: &HttpRequest) -> Result<Outcome<F::Message>, ApiError> {
        log::debug!("{} {}", request.method.as_str(), request.url);
        let response = self.transport.execute(request)?;
        log::debug!(
            "{} {} -> {} {}",
            request.method.as_str(),
            request.url,
            response.status,
            response.status_text
        );
        self.parse_response(response)
    }

    /// `POST` `data` as JSON.
    pub fn create<D: Serialize + ?Sized>(
        &self,
        uri: &str,
        data: &D,
    ) -> Result<Outcome<F::Message>, ApiError> {
        self.execute(&self.build_create(uri, data)?)
    }

    /// `PUT` `data` as JSON.
    pub fn update<D: Serialize + ?Sized>(
        &self,
        uri: &str,
        data: &D,
    ) -> Result<Outcome<F::Message>, ApiError> {
        self.execute(&self.build_update(uri, data)?)
    }

    /// `DELETE` without a body.
    pub fn destroy(&self, uri: &str) -> Result<Outcome<F::Message>, ApiError> {
        self.execute(&self.build_destroy(uri)?)
    }

    /// `DELETE` with `data` as the JSON body, for bulk deletes.
    pub fn destroy_many<D: Serialize + ?Sized>(
        &self,
        uri: &str,
        data: &D,
    ) -> Result<Outcome<F::Message>, ApiError> {
        self.execute(&self.build_destroy_many(uri, data)?)
    }
}

fn encode<D: Serialize + ?Sized>(data: &D) -> Result<String, ApiError> {
    serde_json::to_string(data).map_err(ApiError::Serialization)
}
