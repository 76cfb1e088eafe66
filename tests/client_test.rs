//! End-to-end tests for the Client API against a local scripted server.

mod common;

use common::{body_of, header, header_lines, ok, response, MockServer};
use sessionnet::client::{Client, Timeouts, DEFAULT_CONTENT_TYPE};
use sessionnet::base::neterror::NetError;
use std::time::Duration;

fn request_line(request: &str) -> &str {
    request.lines().next().unwrap_or("")
}

#[tokio::test]
async fn test_get_with_params() {
    let server = MockServer::start(vec![ok("line one\nline two")]).await;
    let client = Client::new();

    let body = client
        .do_get(
            &server.url("/freq_server/allocate"),
            &[("user", "bob smith"), ("n", "1")],
            &[("X-Test", "yes")],
            Timeouts::default(),
        )
        .await
        .unwrap();

    assert_eq!(body, "line one\nline two\n");

    let req = server.request(0);
    assert_eq!(
        request_line(&req),
        "GET /freq_server/allocate?user=bob+smith&n=1 HTTP/1.1"
    );
    let lines = header_lines(&req);
    assert_eq!(header(&lines, "x-test"), Some("yes"));
    assert_eq!(header(&lines, "connection"), Some("close"));
    assert!(header(&lines, "cookie").is_none());
    assert!(header(&lines, "content-type").is_none());
}

#[tokio::test]
async fn test_cookie_carried_to_next_request() {
    let server = MockServer::start(vec![
        response("200 OK", &["Set-Cookie: sid=123; Path=/"], "OK"),
        ok("OK"),
    ])
    .await;
    let client = Client::new();

    client.get(server.url("/a")).send().await.unwrap();
    client.get(server.url("/a/b")).send().await.unwrap();

    let first = header_lines(&server.request(0));
    assert!(header(&first, "cookie").is_none());

    let second = header_lines(&server.request(1));
    assert_eq!(header(&second, "cookie"), Some("sid=123"));
}

#[tokio::test]
async fn test_multiple_set_cookie_headers() {
    let server = MockServer::start(vec![
        response(
            "200 OK",
            &[
                "Set-Cookie: a=1",
                "Set-Cookie: scoped=2; Path=/api",
                "Set-Cookie: b=3; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            ],
            "",
        ),
        ok(""),
    ])
    .await;
    let client = Client::new();

    client.get(server.url("/")).send().await.unwrap();
    // The already-expired cookie is dropped as soon as it is ingested.
    assert_eq!(client.cookie_jar().len(), 2);

    client.get(server.url("/api/users")).send().await.unwrap();
    let lines = header_lines(&server.request(1));
    assert_eq!(header(&lines, "cookie"), Some("a=1; scoped=2"));
}

#[tokio::test]
async fn test_foreign_cookie_from_response_is_dropped() {
    let server = MockServer::start(vec![response(
        "200 OK",
        &["Set-Cookie: evil=1; Domain=attacker.example", "Set-Cookie: good=1"],
        "",
    )])
    .await;
    let client = Client::new();

    client.get(server.url("/")).send().await.unwrap();

    let names: Vec<String> = client
        .cookie_jar()
        .cookies()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    assert_eq!(names, ["good"]);
}

#[tokio::test]
async fn test_post_defaults() {
    let server = MockServer::start(vec![ok("<ok>\n  <id>7</id>\n</ok>\n")]).await;
    let client = Client::new();

    let body = client
        .do_post(
            &server.url("/freq_server/start"),
            Some("<start/>"),
            &[],
            None,
            Timeouts::default(),
        )
        .await
        .unwrap();

    assert_eq!(body, "<ok>  <id>7</id></ok>");

    let req = server.request(0);
    assert_eq!(request_line(&req), "POST /freq_server/start HTTP/1.1");
    let lines = header_lines(&req);
    assert_eq!(header(&lines, "content-type"), Some(DEFAULT_CONTENT_TYPE));
    assert_eq!(header(&lines, "content-length"), Some("8"));
    assert_eq!(body_of(&req), "<start/>");
}

#[tokio::test]
async fn test_post_without_body_sends_empty_body() {
    let server = MockServer::start(vec![ok("done")]).await;
    let client = Client::new();

    let body = client.post(server.url("/stop")).send().await.unwrap();
    assert_eq!(body, "done");

    let req = server.request(0);
    let lines = header_lines(&req);
    assert_eq!(header(&lines, "content-length"), Some("0"));
    assert_eq!(body_of(&req), "");
}

#[tokio::test]
async fn test_put_caller_headers_win() {
    let server = MockServer::start(vec![ok("")]).await;
    let client = Client::new();

    client
        .do_put(
            &server.url("/item/1"),
            Some("{\"a\":1}"),
            &[("Content-Type", "application/json")],
            Some("text/plain"),
            Timeouts::default(),
        )
        .await
        .unwrap();

    let req = server.request(0);
    assert_eq!(request_line(&req), "PUT /item/1 HTTP/1.1");
    let lines = header_lines(&req);
    assert_eq!(header(&lines, "content-type"), Some("application/json"));
    assert_eq!(body_of(&req), "{\"a\":1}");
}

#[tokio::test]
async fn test_explicit_content_type() {
    let server = MockServer::start(vec![ok("")]).await;
    let client = Client::new();

    client
        .post(server.url("/form"))
        .body("a=1")
        .content_type("application/x-www-form-urlencoded")
        .send()
        .await
        .unwrap();

    let lines = header_lines(&server.request(0));
    assert_eq!(
        header(&lines, "content-type"),
        Some("application/x-www-form-urlencoded")
    );
}

#[tokio::test]
async fn test_delete_sends_no_body() {
    let server = MockServer::start(vec![ok("gone")]).await;
    let client = Client::new();

    let body = client
        .do_delete(&server.url("/item/1"), &[], Timeouts::default())
        .await
        .unwrap();
    assert_eq!(body, "gone\n");

    let req = server.request(0);
    assert_eq!(request_line(&req), "DELETE /item/1 HTTP/1.1");
    assert!(header(&header_lines(&req), "content-type").is_none());
    assert_eq!(body_of(&req), "");
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let server = MockServer::start(vec![response(
        "302 Found",
        &["Location: /elsewhere", "Set-Cookie: sid=9"],
        "moved",
    )])
    .await;
    let client = Client::new();

    let resp = client.get(server.url("/start")).execute().await.unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(resp.body(), "moved\n");
    assert_eq!(resp.set_cookie_headers(), ["sid=9"]);
    assert_eq!(server.requests().len(), 1);
    assert_eq!(client.cookie_jar().len(), 1);
}

#[tokio::test]
async fn test_error_status_returns_body() {
    let server = MockServer::start(vec![response("500 Internal Server Error", &[], "ERROR")]).await;
    let client = Client::new();

    let body = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(body, "ERROR\n");
}

#[tokio::test]
async fn test_read_timeout() {
    let server =
        MockServer::start_with_delay(vec![ok("late")], Some(Duration::from_secs(5))).await;
    let client = Client::new();

    let err = client
        .get(server.url("/slow"))
        .read_timeout(Duration::from_millis(100))
        .send()
        .await
        .unwrap_err();
    assert_eq!(err, NetError::ReadTimedOut);
    assert!(err.is_transport_error());
}

#[tokio::test]
async fn test_connection_refused_propagates() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Client::builder()
        .connect_timeout(Duration::from_secs(2))
        .build();
    let err = client
        .get(format!("http://{}/", addr))
        .send()
        .await
        .unwrap_err();
    assert!(err.is_transport_error(), "{err:?}");
}

#[tokio::test]
async fn test_invalid_header_fails_before_connecting() {
    let server = MockServer::start(vec![ok("")]).await;
    let client = Client::new();

    let err = client
        .get(server.url("/"))
        .header("Bad Header", "x")
        .send()
        .await
        .unwrap_err();
    assert!(err.is_encoding_error());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_unknown_scheme() {
    let err = Client::new()
        .get("ftp://localhost/file")
        .send()
        .await
        .unwrap_err();
    assert_eq!(err, NetError::UnknownUrlScheme("ftp".to_string()));
}

#[tokio::test]
async fn test_concurrent_requests_share_jar() {
    let server = MockServer::start(vec![response("200 OK", &["Set-Cookie: sid=1"], "ok")]).await;
    let client = Client::builder().max_cookies(2).build();

    let calls = (0..16).map(|i| {
        let client = client.clone();
        let url = server.url(&format!("/call/{}", i));
        async move { client.get(url).send().await }
    });
    let results = futures::future::join_all(calls).await;

    assert!(results.iter().all(|r| r.as_deref() == Ok("ok\n")));
    assert_eq!(client.cookie_jar().len(), 1);
    assert_eq!(server.requests().len(), 16);
}
