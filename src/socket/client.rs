use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_boring::SslStream;

/// The socket a single request runs over. Closed when dropped.
#[derive(Debug)]
pub enum RequestSocket {
    Plain(TcpStream),
    Tls(SslStream<TcpStream>),
}

/// Forward a poll call to whichever stream is inside.
macro_rules! each_stream {
    ($self:expr, $method:ident($($arg:expr),*)) => {
        match $self.get_mut() {
            RequestSocket::Plain(s) => Pin::new(s).$method($($arg),*),
            RequestSocket::Tls(s) => Pin::new(s).$method($($arg),*),
        }
    };
}

impl RequestSocket {
    pub fn is_tls(&self) -> bool {
        matches!(self, RequestSocket::Tls(_))
    }

    fn tcp(&self) -> &TcpStream {
        match self {
            RequestSocket::Plain(s) => s,
            RequestSocket::Tls(s) => s.get_ref(),
        }
    }

    /// Address actually connected to, after DNS picked one.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.tcp().peer_addr()
    }
}

impl AsyncRead for RequestSocket {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        each_stream!(self, poll_read(cx, buf))
    }
}

impl AsyncWrite for RequestSocket {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        each_stream!(self, poll_write(cx, buf))
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        each_stream!(self, poll_flush(cx))
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        each_stream!(self, poll_shutdown(cx))
    }
}
