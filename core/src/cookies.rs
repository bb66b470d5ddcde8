//! Cookie-store capability and per-request header generation.
//!
//! # Design
//! The client never reads ambient browser state. Whoever owns the session
//! hands in a `CookieStore`, and `generate_headers` reads the CSRF cookie
//! from it once per request.

use std::collections::HashMap;

use crate::config::ClientConfig;
use crate::http::APPLICATION_JSON;

/// Read-only access to named cookies.
pub trait CookieStore {
    fn get(&self, name: &str) -> Option<String>;
}

impl<S: CookieStore + ?Sized> CookieStore for &S {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}

/// In-memory cookie store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: HashMap<String, String>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie:` header value such as `a=1; csrftoken=abc`.
    ///
    /// Segments without `=` are skipped. Later duplicates win.
    pub fn parse(header: &str) -> Self {
        let cookies = header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
            .collect();
        Self { cookies }
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }
}

impl CookieStore for CookieJar {
    fn get(&self, name: &str) -> Option<String> {
        self.cookies.get(name).cloned()
    }
}

/// Build the headers every mutating request carries: the CSRF token plus
/// JSON `Accept` and `Content-Type`.
///
/// The CSRF header is conditional: when the store has no cookie named
/// `config.csrf_cookie`, it is left out entirely rather than sent with a
/// placeholder value, and the server decides how to treat the request.
pub fn generate_headers<C: CookieStore + ?Sized>(
    cookies: &C,
    config: &ClientConfig,
) -> Vec<(String, String)> {
    let mut headers = Vec::with_capacity(3);
    if let Some(token) = cookies.get(&config.csrf_cookie) {
        headers.push((config.csrf_header.clone(), token));
    }
    headers.push(("Accept".to_string(), APPLICATION_JSON.to_string()));
    headers.push(("Content-Type".to_string(), APPLICATION_JSON.to_string()));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cookie_header() {
        let jar = CookieJar::parse("sessionid=s1; csrftoken=abc123 ; junk; =empty");
        assert_eq!(jar.get("csrftoken").as_deref(), Some("abc123"));
        assert_eq!(jar.get("sessionid").as_deref(), Some("s1"));
        assert_eq!(jar.get("junk"), None);
        assert_eq!(jar.get(""), None);
    }

    #[test]
    fn token_values_may_contain_equals() {
        let jar = CookieJar::parse("csrftoken=a=b");
        assert_eq!(jar.get("csrftoken").as_deref(), Some("a=b"));
    }

    #[test]
    fn generated_headers_carry_token_and_json_types() {
        let jar = CookieJar::new().with("csrftoken", "tok");
        let headers = generate_headers(&jar, &ClientConfig::default());
        assert_eq!(
            headers,
            vec![
                ("X-CSRFToken".to_string(), "tok".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ]
        );
    }

    #[test]
    fn missing_cookie_omits_csrf_header() {
        let headers = generate_headers(&CookieJar::new(), &ClientConfig::default());
        assert_eq!(headers.len(), 2);
        assert!(headers.iter().all(|(k, _)| k != "X-CSRFToken"));
    }

    #[test]
    fn custom_cookie_and_header_names() {
        let config = ClientConfig {
            csrf_cookie: "xsrf".to_string(),
            csrf_header: "X-XSRF-Token".to_string(),
            ..ClientConfig::default()
        };
        let jar = CookieJar::parse("xsrf=zzz");
        let headers = generate_headers(&jar, &config);
        assert_eq!(headers[0], ("X-XSRF-Token".to_string(), "zzz".to_string()));
    }
}
