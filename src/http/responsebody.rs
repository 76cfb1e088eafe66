//! Response body reading.
//! Bodies are collected in full, then split into lines.

use crate::base::neterror::NetError;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use std::time::Duration;

/// How lines of the body are joined into the returned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    /// Every line, the last one included, ends with `\n`.
    Terminated,
    /// Lines are concatenated with their terminators removed.
    Joined,
}

/// Response body wrapper.
pub struct ResponseBody {
    inner: Incoming,
}

impl ResponseBody {
    pub fn new(inner: Incoming) -> Self {
        Self { inner }
    }

    /// Read the entire body, failing with `ReadTimedOut` if it does not
    /// arrive within `timeout`.
    pub async fn bytes(self, timeout: Option<Duration>) -> Result<bytes::Bytes, NetError> {
        let collect = self.inner.collect();
        let collected = match timeout {
            Some(limit) => tokio::time::timeout(limit, collect)
                .await
                .map_err(|_| NetError::ReadTimedOut)?,
            None => collect.await,
        };

        collected.map(|c| c.to_bytes()).map_err(|e| {
            tracing::debug!(error = %e, "failed to read response body");
            if e.is_incomplete_message() {
                NetError::ConnectionClosed
            } else {
                NetError::HttpBodyError
            }
        })
    }

    /// Read the body as text, line by line. Invalid UTF-8 is replaced.
    pub async fn text(self, mode: LineMode, timeout: Option<Duration>) -> Result<String, NetError> {
        let bytes = self.bytes(timeout).await?;
        Ok(accumulate_lines(&String::from_utf8_lossy(&bytes), mode))
    }
}

/// Re-join `text` line by line. `\n` and `\r\n` both end a line.
pub fn accumulate_lines(text: &str, mode: LineMode) -> String {
    let mut out = String::with_capacity(text.len() + 1);
    for line in text.lines() {
        out.push_str(line);
        if mode == LineMode::Terminated {
            out.push('\n');
        }
    }
    out
}
