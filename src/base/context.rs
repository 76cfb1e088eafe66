//! Error context helpers for the connect path.
//!
//! Turns bare `io::Error`s into `NetError` variants that name the host the
//! client was trying to reach.

use crate::base::neterror::NetError;
use std::io;

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Attach the target `host:port` to a failed TCP connect.
    ///
    /// ```ignore
    /// let stream = TcpStream::connect(addr).await.connection_context("localhost", 8080)?;
    /// // Error: "Connection to localhost:8080 failed: connection refused"
    /// ```
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError>;

    /// Attach the domain to a failed name lookup.
    fn dns_context(self, domain: &str) -> Result<T, NetError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError> {
        self.map_err(|e| NetError::connection_failed_to(host, port, e))
    }

    fn dns_context(self, domain: &str) -> Result<T, NetError> {
        self.map_err(|e| NetError::dns_failed(domain, e))
    }
}
