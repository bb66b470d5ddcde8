//! Client configuration.

use serde::Deserialize;
use url::{ParseError, Url};

use crate::error::ApiError;

/// Static settings for a `FetchClient`.
///
/// Every field has a default, so a partial JSON document (or `{}`) is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix relative URIs are resolved under. Absolute and
    /// protocol-relative URIs ignore it, except for borrowing its scheme.
    pub base_url: Option<Url>,
    /// Cookie holding the anti-forgery token.
    pub csrf_cookie: String,
    /// Request header the token is sent in.
    pub csrf_header: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            csrf_cookie: "csrftoken".to_string(),
            csrf_header: "X-CSRFToken".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: Some(Url::parse(base_url)?),
            ..Self::default()
        })
    }

    /// Resolve `uri` against `base_url`.
    ///
    /// The base path is treated as a directory, so `/widgets` under
    /// `http://host/api` becomes `http://host/api/widgets`. Without a base
    /// URL, relative URIs are returned unchanged.
    pub fn resolve(&self, uri: &str) -> Result<String, ApiError> {
        match Url::parse(uri) {
            Ok(absolute) => Ok(absolute.into()),
            Err(ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => Ok(join_under(base, uri)?.into()),
                None => Ok(uri.to_string()),
            },
            Err(e) => Err(e.into()),
        }
    }
}

fn join_under(base: &Url, uri: &str) -> Result<Url, ParseError> {
    if uri.starts_with("//") {
        return base.join(uri);
    }
    let mut dir = base.clone();
    if !dir.path().ends_with('/') {
        let path = format!("{}/", dir.path());
        dir.set_path(&path);
    }
    dir.join(uri.trim_start_matches('/'))
}
