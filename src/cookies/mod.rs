//! Cookie parsing and storage.
//!
//! | Type | Responsibility |
//! |------|----------------|
//! | [`Cookie`](cookie::Cookie) | One parsed `Set-Cookie` header |
//! | [`CookieJar`](jar::CookieJar) | Bounded FIFO jar shared by every request of a client |
//! | [`CookieError`](error::CookieError) | Why a header was not stored |
//!
//! # Domain scoping
//!
//! A cookie is either host-only (no `Domain` attribute, or a `Domain` equal to
//! the request host) or scoped to the request host's immediate parent, written
//! with a leading dot. For a request to `api.example.com` the only accepted
//! parent is `.example.com`; anything else is a foreign cookie and is refused.
//!
//! ```rust
//! use sessionnet::cookies::jar::CookieJar;
//! use url::Url;
//!
//! let jar = CookieJar::new();
//! let url = Url::parse("http://api.example.com/login").unwrap();
//! let report = jar.ingest(&url, ["sid=42; Path=/", "evil=1; Domain=attacker.com"]);
//!
//! assert_eq!(report.stored, 1);
//! assert_eq!(report.discarded.len(), 1);
//! assert_eq!(jar.header_for(&url), "sid=42");
//! ```

pub mod cookie;
pub mod error;
pub mod jar;
