//! Request body for POST/PUT operations.

use bytes::Bytes;
use http_body_util::Full;

/// Request body for HTTP methods that send data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    /// No body (GET, DELETE).
    #[default]
    Empty,
    /// UTF-8 encoded text.
    Text(String),
}

impl From<String> for RequestBody {
    fn from(s: String) -> Self {
        RequestBody::Text(s)
    }
}

impl From<&str> for RequestBody {
    fn from(s: &str) -> Self {
        RequestBody::Text(s.to_owned())
    }
}

impl From<Option<String>> for RequestBody {
    fn from(s: Option<String>) -> Self {
        s.map(RequestBody::Text).unwrap_or_default()
    }
}

impl RequestBody {
    /// Check if the body is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the encoded body in bytes, as sent in `Content-Length`.
    pub fn len(&self) -> usize {
        match self {
            RequestBody::Empty => 0,
            RequestBody::Text(s) => s.len(),
        }
    }

    pub(crate) fn into_full(self) -> Full<Bytes> {
        match self {
            RequestBody::Empty => Full::new(Bytes::new()),
            RequestBody::Text(s) => Full::new(Bytes::from(s)),
        }
    }
}
