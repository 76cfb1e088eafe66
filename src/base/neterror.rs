use thiserror::Error;

/// Errors surfaced by a request.
///
/// Variants fall into two groups: encoding failures raised while the request
/// is being assembled (nothing has touched the network yet) and transport
/// failures raised by the connection itself. Status codes are never turned
/// into errors.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NetError {
    // Connection Errors
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Connection to {host}:{port} failed: {reason}")]
    ConnectionFailedTo {
        host: String,
        port: u16,
        reason: String,
    },
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Could not resolve {domain}: {reason}")]
    NameNotResolvedFor { domain: String, reason: String },
    #[error("Connection timed out")]
    ConnectionTimedOut,
    #[error("Read timed out")]
    ReadTimedOut,
    #[error("SSL protocol error")]
    SslProtocolError,

    // HTTP Errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Unknown URL scheme: {0}")]
    UnknownUrlScheme(String),
    #[error("Invalid header: {name}")]
    InvalidHeader { name: String },
    #[error("Invalid response")]
    InvalidResponse,
    #[error("Failed to read response body")]
    HttpBodyError,
}

impl NetError {
    /// Create a connection error carrying the target and the IO cause.
    pub fn connection_failed_to(host: &str, port: u16, err: std::io::Error) -> Self {
        NetError::ConnectionFailedTo {
            host: host.to_string(),
            port,
            reason: err.to_string(),
        }
    }

    /// Create a DNS error carrying the domain and the IO cause.
    pub fn dns_failed(domain: &str, err: std::io::Error) -> Self {
        NetError::NameNotResolvedFor {
            domain: domain.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn invalid_header(name: impl Into<String>) -> Self {
        NetError::InvalidHeader { name: name.into() }
    }

    /// True for failures raised while building the request, before any I/O.
    pub fn is_encoding_error(&self) -> bool {
        matches!(
            self,
            NetError::InvalidUrl | NetError::UnknownUrlScheme(_) | NetError::InvalidHeader { .. }
        )
    }

    /// True for failures of the connection or the response stream.
    pub fn is_transport_error(&self) -> bool {
        !self.is_encoding_error()
    }

    /// Chromium `net_error_list.h` code for this error.
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::ConnectionClosed => -100,
            NetError::ConnectionFailed => -104,
            NetError::ConnectionFailedTo { .. } => -104,
            NetError::NameNotResolved => -105,
            NetError::NameNotResolvedFor { .. } => -105,
            NetError::SslProtocolError => -107,
            NetError::ConnectionTimedOut => -118,
            NetError::ReadTimedOut => -7,

            NetError::InvalidUrl => -300,
            NetError::UnknownUrlScheme(_) => -302,
            NetError::InvalidResponse => -320,
            NetError::InvalidHeader { .. } => -4,
            NetError::HttpBodyError => -2,
        }
    }
}
