//! Cookie parsing errors.
//!
//! These never escape [`CookieJar::ingest`](crate::cookies::jar::CookieJar::ingest):
//! a header that fails to parse is reported back in the
//! [`IngestReport`](crate::cookies::jar::IngestReport) and skipped.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CookieError {
    /// The `Domain` attribute names neither the request host nor its
    /// immediate parent domain.
    #[error("Refusing foreign cookie: domain {domain} does not scope to host {host}")]
    Foreign { domain: String, host: String },

    /// The header has no leading `name=value` pair.
    #[error("Cookie header has no name=value pair: {header}")]
    MissingNameValue { header: String },
}

impl CookieError {
    pub fn is_foreign(&self) -> bool {
        matches!(self, CookieError::Foreign { .. })
    }
}
