//! HTTP Client with builder pattern.
//!
//! Every request carries the cookies the client has collected so far and
//! stores whatever cookies the response sets. Responses come back as raw
//! text; parsing them is up to the caller.
//!
//! # Example
//!
//! ```rust,no_run
//! use sessionnet::client::Client;
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), sessionnet::base::neterror::NetError> {
//! let client = Client::builder()
//!     .connect_timeout(Duration::from_secs(2))
//!     .build();
//!
//! client.post("http://localhost:8080/login").body("<user>bob</user>").send().await?;
//! let status = client
//!     .get("http://localhost:8080/status")
//!     .query("verbose", "true")
//!     .send()
//!     .await?;
//! println!("{status}");
//! # Ok(())
//! # }
//! ```

use crate::base::neterror::NetError;
use crate::cookies::jar::CookieJar;
use crate::http::transaction::HttpTransaction;
use crate::http::{HttpResponse, RequestBody};
use http::Method;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Content type sent with POST and PUT bodies unless told otherwise.
pub const DEFAULT_CONTENT_TYPE: &str = "text/xml; charset=\"UTF-8\"";

/// Connect and read limits for a request. `None` leaves the limit to the
/// operating system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Option<Duration>,
    pub read: Option<Duration>,
}

impl Timeouts {
    pub fn new(connect: Option<Duration>, read: Option<Duration>) -> Self {
        Self { connect, read }
    }
}

/// HTTP Client for making requests.
///
/// Clones share the same cookie jar.
#[derive(Clone)]
pub struct Client {
    cookie_jar: Arc<CookieJar>,
    timeouts: Timeouts,
    content_type: String,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// The jar shared by every request made through this client.
    pub fn cookie_jar(&self) -> &Arc<CookieJar> {
        &self.cookie_jar
    }

    /// Start building a GET request.
    pub fn get<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    /// Start building a POST request.
    pub fn post<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    /// Start building a PUT request.
    pub fn put<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::PUT, url)
    }

    /// Start building a DELETE request.
    pub fn delete<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::DELETE, url)
    }

    fn request<U: AsRef<str>>(&self, method: Method, url: U) -> RequestBuilder {
        RequestBuilder {
            client: self.clone(),
            method,
            url: url.as_ref().to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
            content_type: None,
            timeouts: self.timeouts,
        }
    }

    /// GET `url` with `params` appended as a query string.
    pub async fn do_get(
        &self,
        url: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
        timeouts: Timeouts,
    ) -> Result<String, NetError> {
        self.get(url)
            .queries(params.iter().copied())
            .headers(headers.iter().copied())
            .timeouts(timeouts)
            .send()
            .await
    }

    /// POST `body` (empty when `None`). `content_type` falls back to the
    /// client default.
    pub async fn do_post(
        &self,
        url: &str,
        body: Option<&str>,
        headers: &[(&str, &str)],
        content_type: Option<&str>,
        timeouts: Timeouts,
    ) -> Result<String, NetError> {
        self.with_body(self.post(url), body, headers, content_type, timeouts)
            .send()
            .await
    }

    /// PUT `body`, same conventions as [`Client::do_post`].
    pub async fn do_put(
        &self,
        url: &str,
        body: Option<&str>,
        headers: &[(&str, &str)],
        content_type: Option<&str>,
        timeouts: Timeouts,
    ) -> Result<String, NetError> {
        self.with_body(self.put(url), body, headers, content_type, timeouts)
            .send()
            .await
    }

    pub async fn do_delete(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        timeouts: Timeouts,
    ) -> Result<String, NetError> {
        self.delete(url)
            .headers(headers.iter().copied())
            .timeouts(timeouts)
            .send()
            .await
    }

    fn with_body(
        &self,
        mut builder: RequestBuilder,
        body: Option<&str>,
        headers: &[(&str, &str)],
        content_type: Option<&str>,
        timeouts: Timeouts,
    ) -> RequestBuilder {
        if let Some(body) = body {
            builder = builder.body(body);
        }
        if let Some(content_type) = content_type {
            builder = builder.content_type(content_type);
        }
        builder.headers(headers.iter().copied()).timeouts(timeouts)
    }
}

/// Builder for creating a [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    cookie_jar: Option<Arc<CookieJar>>,
    max_cookies: Option<usize>,
    timeouts: Timeouts,
    content_type: Option<String>,
}

impl ClientBuilder {
    /// Share an existing jar, e.g. between two clients of one test.
    pub fn cookie_jar(mut self, jar: Arc<CookieJar>) -> Self {
        self.cookie_jar = Some(jar);
        self
    }

    /// Capacity of the client's own jar. Ignored when a jar is supplied.
    pub fn max_cookies(mut self, max: usize) -> Self {
        self.max_cookies = Some(max);
        self
    }

    /// Default connect timeout for every request.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.connect = Some(timeout);
        self
    }

    /// Default read timeout for every request.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.read = Some(timeout);
        self
    }

    /// Default content type for POST and PUT bodies.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Client {
        let max_cookies = self.max_cookies;
        let cookie_jar = self.cookie_jar.unwrap_or_else(|| {
            Arc::new(
                max_cookies
                    .map(CookieJar::with_capacity)
                    .unwrap_or_default(),
            )
        });

        Client {
            cookie_jar,
            timeouts: self.timeouts,
            content_type: self
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        }
    }
}

/// Builder for a single request.
pub struct RequestBuilder {
    client: Client,
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: RequestBody,
    content_type: Option<String>,
    timeouts: Timeouts,
}

impl RequestBuilder {
    /// Append a query parameter. Only GET requests carry the query string;
    /// other methods use the URL as given. Repeating a key sends it twice.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn queries<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add a header. It replaces any header of the same name the client
    /// would set, `Cookie` and `Content-Type` included.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set request body. Only POST and PUT send it.
    pub fn body<B: Into<RequestBody>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    /// Content type for this request's body, overriding the client default.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.connect = Some(timeout);
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.read = Some(timeout);
        self
    }

    /// Replace both timeouts. `None` fields fall back to the client defaults.
    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts.connect = timeouts.connect.or(self.timeouts.connect);
        self.timeouts.read = timeouts.read.or(self.timeouts.read);
        self
    }

    /// The URL the request goes to, query string included.
    pub fn final_url(&self) -> Result<Url, NetError> {
        let mut url = Url::parse(&self.url).map_err(|_| NetError::InvalidUrl)?;
        if self.method == Method::GET && !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }

    /// Send the request and return the full response.
    pub async fn execute(self) -> Result<HttpResponse, NetError> {
        let url = self.final_url()?;

        let mut transaction =
            HttpTransaction::new(self.method, url, self.client.cookie_jar.clone());
        transaction.set_content_type(
            self.content_type
                .as_deref()
                .unwrap_or(&self.client.content_type),
        );
        for (key, value) in &self.headers {
            transaction.add_header(key, value);
        }
        transaction.set_body(self.body);
        transaction.set_timeouts(self.timeouts.connect, self.timeouts.read);

        transaction.start().await
    }

    /// Send the request and return the response body, whatever the status.
    pub async fn send(self) -> Result<String, NetError> {
        Ok(self.execute().await?.into_body())
    }
}
