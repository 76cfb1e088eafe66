//! HTTP response as returned to the caller.

use http::header::SET_COOKIE;
use http::{HeaderMap, StatusCode, Version};

/// A fully read response.
///
/// The status is reported but never interpreted: a `404` or a `302` is a
/// successful call as far as the client is concerned.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, version: Version, headers: HeaderMap, body: String) -> Self {
        Self {
            status,
            version,
            headers,
            body,
        }
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the HTTP version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Get a reference to the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw `Set-Cookie` values, in the order received.
    pub fn set_cookie_headers(&self) -> Vec<&str> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }
}
