//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The table
//! layer builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network; a `Transport` performs the actual round-trip. Tests
//! can therefore check every request the client would send without a server.

/// HTTP method for a request. PostgREST updates rows with `PATCH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already carries the encoded query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "http://localhost/rest/v1/todos".to_string(),
            headers: vec![("Prefer".to_string(), "return=representation".to_string())],
            body: None,
        };
        assert_eq!(req.header("prefer"), Some("return=representation"));
        assert_eq!(req.header("apikey"), None);
    }

    #[test]
    fn success_range_is_2xx() {
        let ok = HttpResponse { status: 204, body: String::new() };
        let redirect = HttpResponse { status: 301, body: String::new() };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
    }
}
