//! # sessionnet
//!
//! A small HTTP/1.1 client for driving a remote service from a test suite.
//!
//! Every request made through a [`Client`](client::Client) carries the
//! cookies collected from earlier responses, so a login followed by a series
//! of calls behaves like a browser session. Response bodies are returned as
//! raw text.
//!
//! ## Features
//!
//! - **Cookie Jar**: bounded FIFO jar with domain/path scoping and lazy expiry
//! - **Four verbs**: GET (with query parameters), POST, PUT and DELETE
//! - **No surprises**: redirects are returned, not followed; nothing is retried;
//!   status codes are not turned into errors
//! - **Timeouts**: per-client and per-request connect/read limits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sessionnet::client::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sessionnet::base::neterror::NetError> {
//!     let client = Client::new();
//!     client
//!         .post("http://localhost:8080/freq_server/start")
//!         .send()
//!         .await?;
//!     let body = client
//!         .get("http://localhost:8080/freq_server/allocate")
//!         .send()
//!         .await?;
//!     println!("{body}");
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions
//! - [`cookies`] - Cookie parsing and the cookie jar
//! - [`http`] - Request execution and bodies
//! - [`socket`] - Connection setup (TCP, TLS)
//! - [`client`] - High-level request API

pub mod base;
pub mod client;
pub mod cookies;
pub mod http;
pub mod socket;

pub use base::neterror::NetError;
pub use client::{Client, ClientBuilder, RequestBuilder, Timeouts};
pub use cookies::cookie::Cookie;
pub use cookies::error::CookieError;
pub use cookies::jar::{CookieJar, IngestReport, MAX_COOKIES};
