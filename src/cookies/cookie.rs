use crate::cookies::error::CookieError;
use std::fmt;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};
use url::Url;

/// `dd MMM yyyy HH:mm:ss GMT`, the part of an RFC 1123 date after the weekday.
const EXPIRES_SPACED: &[BorrowedFormatItem<'static>] = format_description!(
    "[day padding:none] [month repr:short case_sensitive:false] [year] [hour padding:none]:[minute padding:none]:[second padding:none] GMT"
);

/// `dd-MMM-yyyy HH:mm:ss GMT`, the Netscape variant.
const EXPIRES_DASHED: &[BorrowedFormatItem<'static>] = format_description!(
    "[day padding:none]-[month repr:short case_sensitive:false]-[year] [hour padding:none]:[minute padding:none]:[second padding:none] GMT"
);

/// A cookie received in a `Set-Cookie` response header.
///
/// Cookies are never mutated after parsing. A later header with the same
/// domain and name replaces the stored cookie instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    site_url: Url,
    name: String,
    value: String,
    domain: String,
    path: String,
    expires: Option<OffsetDateTime>,
}

impl Cookie {
    /// Parse one `Set-Cookie` header line received from `request_url`.
    ///
    /// The first `name=value` segment is the identity. Of the attributes that
    /// follow only `Domain`, `Path` and `Expires` are kept; flags such as
    /// `Secure` or `HttpOnly` are ignored. A `Domain` that is neither the
    /// request host nor the suffix of the host starting at its first dot
    /// rejects the whole cookie.
    pub fn parse(request_url: &Url, header: &str) -> Result<Self, CookieError> {
        let host = request_url.host_str().unwrap_or("");
        let mut segments = header.split(';');

        let (name, value) = segments
            .next()
            .and_then(|pair| pair.split_once('='))
            .map(|(name, value)| (name.trim(), value.trim()))
            .filter(|(name, _)| !name.is_empty())
            .ok_or_else(|| CookieError::MissingNameValue {
                header: header.to_string(),
            })?;

        let mut cookie = Cookie {
            site_url: request_url.clone(),
            name: name.to_string(),
            value: value.to_string(),
            domain: host.to_string(),
            path: "/".to_string(),
            expires: None,
        };

        for segment in segments {
            let Some((attr, attr_value)) = segment.split_once('=') else {
                continue;
            };
            let (attr, attr_value) = (attr.trim(), attr_value.trim());

            if attr.eq_ignore_ascii_case("domain") {
                cookie.domain = scoped_domain(host, attr_value)?;
            } else if attr.eq_ignore_ascii_case("path") {
                // Anything not absolute keeps the default of "/".
                if attr_value.starts_with('/') {
                    cookie.path = attr_value.to_string();
                }
            } else if attr.eq_ignore_ascii_case("expires") {
                cookie.expires = parse_expires(attr_value);
            }
        }

        Ok(cookie)
    }

    /// URL of the response that set this cookie.
    pub fn site_url(&self) -> &Url {
        &self.site_url
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Either the request host or `.parent.domain`.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `None` for session cookies.
    pub fn expires(&self) -> Option<OffsetDateTime> {
        self.expires
    }

    pub fn is_session(&self) -> bool {
        self.expires.is_none()
    }

    pub fn has_expired(&self) -> bool {
        self.has_expired_at(OffsetDateTime::now_utc())
    }

    /// Session cookies never expire; others expire once `now` is strictly
    /// after the expiry instant.
    pub fn has_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires.is_some_and(|expires| now > expires)
    }

    /// Path check only. Domain selection is done by the jar.
    pub fn matches(&self, url: &Url) -> bool {
        self.matches_at(url, OffsetDateTime::now_utc())
    }

    pub(crate) fn matches_at(&self, url: &Url, now: OffsetDateTime) -> bool {
        if self.has_expired_at(now) {
            return false;
        }

        let path = match url.path() {
            "" => "/",
            path => path,
        };
        path.starts_with(self.path.as_str())
    }

    /// Whether this cookie's domain applies to `host`.
    pub fn domain_matches(&self, host: &str) -> bool {
        self.domain == host || parent_suffix(host) == Some(self.domain.as_str())
    }

    /// `name=value`, the fragment sent in a `Cookie` request header.
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// The host from its first dot onwards: `a.example.com` -> `.example.com`.
///
/// Only the first label is stripped, so `a.b.example.com` yields
/// `.b.example.com` and a cookie for `.example.com` is foreign there.
fn parent_suffix(host: &str) -> Option<&str> {
    host.find('.').map(|idx| &host[idx..])
}

fn scoped_domain(host: &str, requested: &str) -> Result<String, CookieError> {
    let requested = requested.trim().to_ascii_lowercase();
    if requested == host {
        return Ok(requested);
    }

    let dotted = if requested.starts_with('.') {
        requested
    } else {
        format!(".{requested}")
    };

    if parent_suffix(host) == Some(dotted.as_str()) {
        Ok(dotted)
    } else {
        Err(CookieError::Foreign {
            domain: dotted,
            host: host.to_string(),
        })
    }
}

/// Parse an `Expires` value. The weekday is not checked against the date.
/// Dates in neither accepted layout yield `None`, making a session cookie.
fn parse_expires(value: &str) -> Option<OffsetDateTime> {
    let (_weekday, date) = value.trim().split_once(',')?;
    let date = date.trim();

    [EXPIRES_SPACED, EXPIRES_DASHED]
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(date, format).ok())
        .map(PrimitiveDateTime::assume_utc)
}
