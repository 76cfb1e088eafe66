use crate::cookies::cookie::Cookie;
use crate::cookies::error::CookieError;
use parking_lot::Mutex;
use std::collections::VecDeque;
use time::OffsetDateTime;
use url::Url;

/// Default jar capacity.
/// Sized for a test client that talks to a single service.
pub const MAX_COOKIES: usize = 4;

/// A bounded, insertion-ordered cookie jar.
///
/// Every operation takes the same lock, so concurrent requests never observe
/// a half-applied replace, eviction or expiry purge. The lock is never held
/// across network I/O.
#[derive(Debug)]
pub struct CookieJar {
    cookies: Mutex<VecDeque<Cookie>>,
    capacity: usize,
}

/// A `Set-Cookie` header that was not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardedCookie {
    pub header: String,
    pub reason: CookieError,
}

/// Outcome of one [`CookieJar::ingest`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Cookies parsed and stored, replacements included.
    pub stored: usize,
    /// Expired entries dropped before eviction ran.
    pub expired: usize,
    /// Oldest entries dropped to get back under capacity.
    pub evicted: usize,
    pub discarded: Vec<DiscardedCookie>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.discarded.is_empty()
    }
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieJar {
    pub fn new() -> Self {
        Self::with_capacity(MAX_COOKIES)
    }

    /// A jar holding at most `capacity` cookies. A capacity of zero is
    /// raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            cookies: Mutex::new(VecDeque::with_capacity(capacity + 1)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store the cookies from a response's `Set-Cookie` headers.
    ///
    /// A header that fails to parse is reported and skipped; the rest of the
    /// batch is still stored. A cookie replaces any stored cookie with the
    /// same domain and name, and the replacement counts as newest. Once the
    /// batch is in, expired cookies are dropped, then the oldest cookies are
    /// evicted until the jar is back within capacity.
    pub fn ingest<I, S>(&self, url: &Url, headers: I) -> IngestReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = IngestReport::default();
        let mut cookies = self.cookies.lock();

        for header in headers {
            let header = header.as_ref();
            let cookie = match Cookie::parse(url, header) {
                Ok(cookie) => cookie,
                Err(reason) => {
                    if reason.is_foreign() {
                        tracing::warn!(%url, %reason, "discarding foreign cookie");
                    } else {
                        tracing::debug!(%url, %reason, "discarding malformed cookie");
                    }
                    report.discarded.push(DiscardedCookie {
                        header: header.to_string(),
                        reason,
                    });
                    continue;
                }
            };

            cookies.retain(|c| c.domain() != cookie.domain() || c.name() != cookie.name());
            tracing::debug!(
                name = cookie.name(),
                domain = cookie.domain(),
                path = cookie.path(),
                "storing cookie"
            );
            cookies.push_back(cookie);
            report.stored += 1;
        }

        report.expired = Self::purge_locked(&mut cookies, OffsetDateTime::now_utc());

        while cookies.len() > self.capacity {
            if let Some(evicted) = cookies.pop_front() {
                tracing::debug!(name = evicted.name(), domain = evicted.domain(), "evicting cookie");
                report.evicted += 1;
            }
        }

        report
    }

    /// The `Cookie` request header value for `url`, or an empty string when
    /// nothing applies.
    ///
    /// Expired cookies are dropped from the jar first. Cookies are emitted in
    /// insertion order.
    pub fn header_for(&self, url: &Url) -> String {
        let now = OffsetDateTime::now_utc();
        let host = url.host_str().unwrap_or("");
        let mut cookies = self.cookies.lock();

        Self::purge_locked(&mut cookies, now);

        cookies
            .iter()
            .filter(|c| c.domain_matches(host) && c.matches_at(url, now))
            .map(Cookie::serialize)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Drop every expired cookie. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut cookies = self.cookies.lock();
        Self::purge_locked(&mut cookies, OffsetDateTime::now_utc())
    }

    fn purge_locked(cookies: &mut VecDeque<Cookie>, now: OffsetDateTime) -> usize {
        let before = cookies.len();
        cookies.retain(|c| !c.has_expired_at(now));
        let purged = before - cookies.len();
        if purged > 0 {
            tracing::debug!(purged, "purged expired cookies");
        }
        purged
    }

    /// Snapshot of the stored cookies, oldest first.
    pub fn cookies(&self) -> Vec<Cookie> {
        self.cookies.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.cookies.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.lock().is_empty()
    }

    pub fn clear(&self) {
        self.cookies.lock().clear();
    }
}
