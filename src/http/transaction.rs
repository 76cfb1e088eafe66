use crate::base::neterror::NetError;
use crate::cookies::jar::CookieJar;
use crate::http::requestbody::RequestBody;
use crate::http::response::HttpResponse;
use crate::http::responsebody::{LineMode, ResponseBody};
use crate::http::streamfactory::{HttpStream, HttpStreamFactory};
use http::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, HOST, SET_COOKIE};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Response};
use hyper::body::Incoming;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use url::{Position, Url};

/// Internal state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    CreateStream,
    SendRequest,
    ReadBody,
    Done,
}

/// One request/response exchange on a fresh connection.
///
/// The transaction consults the cookie jar before sending and feeds the
/// response's `Set-Cookie` headers back into it. The jar is only locked for
/// those two steps, never while waiting on the network. Redirects are not
/// followed and nothing is retried.
pub struct HttpTransaction {
    method: Method,
    url: Url,
    state: State,
    stream: Option<HttpStream>,
    response: Option<Response<Incoming>>,
    result: Option<HttpResponse>,
    extra_headers: Vec<(String, String)>,
    content_type: Option<String>,
    body: RequestBody,
    cookie_jar: Arc<CookieJar>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

impl HttpTransaction {
    pub fn new(method: Method, url: Url, cookie_jar: Arc<CookieJar>) -> Self {
        Self {
            method,
            url,
            state: State::Idle,
            stream: None,
            response: None,
            result: None,
            extra_headers: Vec::new(),
            content_type: None,
            body: RequestBody::Empty,
            cookie_jar,
            connect_timeout: None,
            read_timeout: None,
        }
    }

    /// Add a caller header. Later values for the same name replace earlier
    /// ones, and caller headers replace the ones the transaction fills in.
    pub fn add_header(&mut self, key: &str, value: &str) {
        self.extra_headers.push((key.to_string(), value.to_string()));
    }

    /// Content type used when the caller did not set `Content-Type`.
    pub fn set_content_type(&mut self, content_type: &str) {
        self.content_type = Some(content_type.to_string());
    }

    /// Body for POST and PUT. Ignored for other methods.
    pub fn set_body(&mut self, body: RequestBody) {
        self.body = body;
    }

    pub fn set_timeouts(&mut self, connect: Option<Duration>, read: Option<Duration>) {
        self.connect_timeout = connect;
        self.read_timeout = read;
    }

    fn sends_body(&self) -> bool {
        self.method == Method::POST || self.method == Method::PUT
    }

    /// Lines of GET and DELETE responses keep their newline; POST and PUT
    /// responses are joined into a single line.
    fn line_mode(&self) -> LineMode {
        if self.sends_body() {
            LineMode::Joined
        } else {
            LineMode::Terminated
        }
    }

    /// Assemble the request. Fails before any I/O if a header cannot be
    /// encoded.
    fn build_request(&self) -> Result<Request<http_body_util::Full<bytes::Bytes>>, NetError> {
        let mut headers = HeaderMap::new();

        let host = self.url.host_str().ok_or(NetError::InvalidUrl)?;
        let host = match self.url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        headers.insert(HOST, header_value(HOST.as_str(), &host)?);
        headers.insert(CONNECTION, HeaderValue::from_static("close"));

        let cookies = self.cookie_jar.header_for(&self.url);
        if !cookies.is_empty() {
            headers.insert(COOKIE, header_value(COOKIE.as_str(), &cookies)?);
        }

        for (key, value) in &self.extra_headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| NetError::invalid_header(key.as_str()))?;
            headers.insert(name, header_value(key, value)?);
        }

        let body = if self.sends_body() {
            if !headers.contains_key(CONTENT_LENGTH) {
                headers.insert(CONTENT_LENGTH, HeaderValue::from(self.body.len()));
            }
            if !headers.contains_key(CONTENT_TYPE) {
                if let Some(content_type) = &self.content_type {
                    headers.insert(CONTENT_TYPE, header_value(CONTENT_TYPE.as_str(), content_type)?);
                }
            }
            self.body.clone()
        } else {
            RequestBody::Empty
        };

        let mut req = Request::builder()
            .method(self.method.clone())
            .uri(&self.url[Position::BeforePath..])
            .body(body.into_full())
            .map_err(|_| NetError::InvalidUrl)?;
        *req.headers_mut() = headers;

        Ok(req)
    }

    /// Run the exchange to completion and return the response.
    pub async fn start(&mut self) -> Result<HttpResponse, NetError> {
        let request = self.build_request()?;
        let mut request = Some(request);
        self.state = State::CreateStream;

        let outcome = self.do_loop(&mut request).await;

        // Release the connection on every path.
        self.stream = None;
        self.response = None;
        self.state = State::Done;

        outcome?;
        self.result.take().ok_or(NetError::InvalidResponse)
    }

    async fn do_loop(
        &mut self,
        request: &mut Option<Request<http_body_util::Full<bytes::Bytes>>>,
    ) -> Result<(), NetError> {
        loop {
            match self.state {
                State::Idle | State::Done => return Ok(()),
                State::CreateStream => {
                    tracing::debug!(method = %self.method, url = %self.url, "connecting");
                    self.stream =
                        Some(HttpStreamFactory::create_stream(&self.url, self.connect_timeout).await?);
                    self.state = State::SendRequest;
                }
                State::SendRequest => {
                    let stream = self.stream.as_mut().ok_or(NetError::ConnectionClosed)?;
                    let req = request.take().ok_or(NetError::InvalidResponse)?;

                    let send = stream.send_request(req);
                    let resp = match self.read_timeout {
                        Some(limit) => tokio::time::timeout(limit, send)
                            .await
                            .map_err(|_| NetError::ReadTimedOut)??,
                        None => send.await?,
                    };

                    let set_cookies = set_cookie_values(resp.headers());
                    if !set_cookies.is_empty() {
                        let report = self.cookie_jar.ingest(&self.url, set_cookies);
                        tracing::debug!(
                            stored = report.stored,
                            expired = report.expired,
                            evicted = report.evicted,
                            discarded = report.discarded.len(),
                            "ingested response cookies"
                        );
                    }

                    self.response = Some(resp);
                    self.state = State::ReadBody;
                }
                State::ReadBody => {
                    let resp = self.response.take().ok_or(NetError::InvalidResponse)?;
                    let (parts, body) = resp.into_parts();
                    let text = ResponseBody::new(body)
                        .text(self.line_mode(), self.read_timeout)
                        .await?;

                    tracing::debug!(
                        method = %self.method,
                        url = %self.url,
                        status = parts.status.as_u16(),
                        bytes = text.len(),
                        "request complete"
                    );
                    self.result = Some(HttpResponse::new(
                        parts.status,
                        parts.version,
                        parts.headers,
                        text,
                    ));
                    self.state = State::Done;
                }
            }
        }
    }
}

/// Every `Set-Cookie` value of a response. Bytes outside ASCII are replaced
/// rather than dropped, so the jar still reports the header.
fn set_cookie_values(headers: &HeaderMap) -> Vec<Cow<'_, str>> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()))
        .collect()
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, NetError> {
    HeaderValue::from_str(value).map_err(|_| NetError::invalid_header(name))
}
