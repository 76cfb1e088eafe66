use crate::base::neterror::NetError;
use crate::socket::connectjob::ConnectJob;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

/// An HTTP/1.1 connection dedicated to a single request.
///
/// Dropping the stream tears the connection down, whether or not the
/// response was read to the end.
pub struct HttpStream {
    sender: http1::SendRequest<Full<Bytes>>,
    driver: JoinHandle<()>,
}

impl HttpStream {
    pub async fn send_request(
        &mut self,
        req: Request<Full<Bytes>>,
    ) -> Result<Response<Incoming>, NetError> {
        self.sender.send_request(req).await.map_err(|e| {
            tracing::debug!(error = %e, "request failed");
            if e.is_incomplete_message() || e.is_canceled() || e.is_closed() {
                NetError::ConnectionClosed
            } else if e.is_parse() {
                NetError::InvalidResponse
            } else {
                NetError::ConnectionFailed
            }
        })
    }
}

impl Drop for HttpStream {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

/// Opens connections and performs the HTTP/1.1 handshake.
pub struct HttpStreamFactory;

impl HttpStreamFactory {
    pub async fn create_stream(
        url: &Url,
        connect_timeout: Option<Duration>,
    ) -> Result<HttpStream, NetError> {
        // 1. Get raw socket
        let socket = ConnectJob::connect(url, connect_timeout).await?;
        tracing::debug!(peer = ?socket.peer_addr().ok(), tls = socket.is_tls(), "connected");

        // 2. Handshake
        let io = TokioIo::new(socket);
        let (sender, conn) = http1::handshake(io).await.map_err(|e| {
            tracing::debug!(error = %e, "HTTP/1.1 handshake failed");
            NetError::ConnectionFailed
        })?;

        // 3. Spawn the connection driver
        let driver = tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "connection closed with error");
            }
        });

        Ok(HttpStream { sender, driver })
    }
}
