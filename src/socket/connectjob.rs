use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use crate::socket::client::RequestSocket;
use boring::ssl::{SslConnector, SslMethod, SslVersion};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use url::{Host, Url};

/// Opens a fresh connection for one request: DNS -> TCP -> TLS.
/// There is no pooling; the socket is dropped with the response.
pub struct ConnectJob;

impl ConnectJob {
    /// Connect to the origin of `url`, giving up after `timeout` if one is
    /// set. The timeout covers resolution, TCP connect and the TLS handshake.
    pub async fn connect(url: &Url, timeout: Option<Duration>) -> Result<RequestSocket, NetError> {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, Self::connect_inner(url))
                .await
                .map_err(|_| {
                    tracing::debug!(%url, ?limit, "connect timed out");
                    NetError::ConnectionTimedOut
                })?,
            None => Self::connect_inner(url).await,
        }
    }

    async fn connect_inner(url: &Url) -> Result<RequestSocket, NetError> {
        let use_tls = match url.scheme() {
            "https" => true,
            "http" => false,
            other => return Err(NetError::UnknownUrlScheme(other.to_string())),
        };
        let port = url.port_or_known_default().ok_or(NetError::InvalidUrl)?;

        // 1. DNS Resolution, skipped for IP literals
        let target = url.host().ok_or(NetError::InvalidUrl)?;
        let (host, addrs): (String, Vec<SocketAddr>) = match target {
            Host::Domain(domain) => {
                let addrs = tokio::net::lookup_host((domain, port))
                    .await
                    .dns_context(domain)?
                    .collect::<Vec<_>>();
                (domain.to_string(), addrs)
            }
            Host::Ipv4(ip) => (ip.to_string(), vec![SocketAddr::new(ip.into(), port)]),
            Host::Ipv6(ip) => (ip.to_string(), vec![SocketAddr::new(ip.into(), port)]),
        };
        if addrs.is_empty() {
            return Err(NetError::NameNotResolved);
        }

        // 2. TCP Connect, first address that answers wins
        let mut last_err = None;
        let mut stream = None;
        for addr in addrs {
            match TcpStream::connect(addr).await {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => {
                    tracing::debug!(%addr, error = %e, "TCP connect failed");
                    last_err = Some(e);
                }
            }
        }

        let stream = match (stream, last_err) {
            (Some(s), _) => s,
            (None, Some(e)) => Err(e).connection_context(&host, port)?,
            (None, None) => return Err(NetError::ConnectionFailed),
        };
        let _ = stream.set_nodelay(true);

        // 3. SSL Handshake (if https)
        if use_tls {
            let mut builder = SslConnector::builder(SslMethod::tls())
                .map_err(|_| NetError::SslProtocolError)?;
            builder
                .set_min_proto_version(Some(SslVersion::TLS1_2))
                .map_err(|_| NetError::SslProtocolError)?;
            // HTTP/1.1 only
            builder
                .set_alpn_protos(b"\x08http/1.1")
                .map_err(|_| NetError::SslProtocolError)?;

            let config = builder
                .build()
                .configure()
                .map_err(|_| NetError::SslProtocolError)?;

            let tls_stream = tokio_boring::connect(config, &host, stream)
                .await
                .map_err(|e| {
                    tracing::debug!(%host, error = ?e, "SSL handshake failed");
                    NetError::SslProtocolError
                })?;

            Ok(RequestSocket::Tls(tls_stream))
        } else {
            Ok(RequestSocket::Plain(stream))
        }
    }
}
