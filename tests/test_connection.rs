use std::io;
use std::sync::Arc;

use searchd::http::connection::{Connection, ConnectionError};
use searchd::http::parser::ParseError;
use searchd::http::response::Response;
use searchd::router::Router;
use searchd::search::{QueryProcessor, SearchIndex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_test::io::Builder;

const TWO_REQUESTS: &[u8] =
    b"GET /static/a.txt HTTP/1.1\r\nHost: x\r\n\r\nGET /query?terms=bike HTTP/1.1\r\nUser-Agent: t\r\n\r\n";

fn test_router() -> Router {
    let index = SearchIndex::from_documents("mem", [("bikes.txt", "bike bike ride")]);
    Router::new(".", Arc::new(QueryProcessor::new(vec![index])))
}

#[tokio::test]
async fn test_pipelined_requests_in_one_read() {
    let mock = Builder::new().read(TWO_REQUESTS).build();
    let mut conn = Connection::new(mock);

    let first = conn.get_next_request().await.unwrap();
    assert_eq!(first.uri, "/static/a.txt");
    assert_eq!(first.header("host"), Some("x"));
    assert!(conn.buffered().starts_with(b"GET /query"));

    let second = conn.get_next_request().await.unwrap();
    assert_eq!(second.uri, "/query?terms=bike");
    assert_eq!(second.header("user-agent"), Some("t"));
    assert!(conn.buffered().is_empty());
}

#[tokio::test]
async fn test_fragmented_reads_match_single_read() {
    let mut builder = Builder::new();
    for chunk in TWO_REQUESTS.chunks(3) {
        builder.read(chunk);
    }
    let mut fragmented = Connection::new(builder.build());
    let mut whole = Connection::new(Builder::new().read(TWO_REQUESTS).build());

    for _ in 0..2 {
        let a = fragmented.get_next_request().await.unwrap();
        let b = whole.get_next_request().await.unwrap();
        assert_eq!(a, b);
    }
    assert!(fragmented.buffered().is_empty());
    assert!(whole.buffered().is_empty());
}

#[tokio::test]
async fn test_partial_next_header_is_kept() {
    let mock = Builder::new()
        .read(b"GET /a HTTP/1.1\r\n\r\nGET /b")
        .read(b" HTTP/1.1\r\n\r\n")
        .build();
    let mut conn = Connection::new(mock);

    assert_eq!(conn.get_next_request().await.unwrap().uri, "/a");
    assert_eq!(conn.buffered(), b"GET /b");

    assert_eq!(conn.get_next_request().await.unwrap().uri, "/b");
    assert!(conn.buffered().is_empty());
}

#[tokio::test]
async fn test_eof_before_terminator_fails() {
    let mock = Builder::new().read(b"GET / HTTP/1.1\r\nHost: x\r\n").build();
    let mut conn = Connection::new(mock);

    let err = conn.get_next_request().await.unwrap_err();
    assert!(matches!(err, ConnectionError::Closed));
}

#[tokio::test]
async fn test_eof_on_idle_connection_fails() {
    let mut conn = Connection::new(Builder::new().build());

    assert!(matches!(
        conn.get_next_request().await,
        Err(ConnectionError::Closed)
    ));
}

#[tokio::test]
async fn test_read_error_fails() {
    let mock = Builder::new()
        .read(b"GET / HT")
        .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        .build();
    let mut conn = Connection::new(mock);

    assert!(matches!(
        conn.get_next_request().await,
        Err(ConnectionError::Io(_))
    ));
}

#[tokio::test]
async fn test_malformed_request_fails() {
    let mock = Builder::new().read(b"POST / HTTP/1.1\r\n\r\n").build();
    let mut conn = Connection::new(mock);

    assert!(matches!(
        conn.get_next_request().await,
        Err(ConnectionError::Malformed(ParseError::InvalidMethod))
    ));
}

#[tokio::test]
async fn test_header_without_separator_fails_whole_request() {
    let mock = Builder::new()
        .read(b"GET /ok HTTP/1.1\r\nHost: x\r\nbogus\r\n\r\n")
        .build();
    let mut conn = Connection::new(mock);

    assert!(matches!(
        conn.get_next_request().await,
        Err(ConnectionError::Malformed(ParseError::InvalidHeader))
    ));
}

#[tokio::test]
async fn test_write_response_writes_every_byte() {
    let mut response = Response::ok("hi");
    response.set_content_type("text/plain");

    let mock = Builder::new()
        .write(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 2\r\n\r\nhi")
        .build();
    let mut conn = Connection::new(mock);

    conn.write_response(&response).await.unwrap();
}

#[tokio::test]
async fn test_write_to_closed_peer_fails() {
    let (server, client) = tokio::io::duplex(64);
    drop(client);
    let mut conn = Connection::new(server);

    assert!(conn.write_response(&Response::ok("x")).await.is_err());
}

#[tokio::test]
async fn test_run_closes_after_connection_close_header() {
    let (mut client, server) = tokio::io::duplex(64 * 1024);
    let router = test_router();

    let handle = tokio::spawn(async move {
        let mut conn = Connection::new(server);
        let result = conn.run(&router).await;
        (result.is_ok(), conn.buffered().to_vec())
    });

    client
        .write_all(b"GET /query?terms=bike HTTP/1.1\r\nConnection: close\r\n\r\nGET / HTTP/1.1\r\n\r\n")
        .await
        .unwrap();

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    let text = String::from_utf8_lossy(&out);

    let (clean_close, leftover) = handle.await.unwrap();
    assert!(clean_close);
    assert_eq!(text.matches("HTTP/1.1 200 OK").count(), 1);
    assert!(text.contains("1 result found"));
    assert_eq!(leftover, b"GET / HTTP/1.1\r\n\r\n");
}

#[tokio::test]
async fn test_run_serves_keep_alive_requests_until_eof() {
    let (mut client, server) = tokio::io::duplex(64 * 1024);
    let router = test_router();

    let handle = tokio::spawn(async move {
        let mut conn = Connection::new(server);
        conn.run(&router).await
    });

    client
        .write_all(b"GET / HTTP/1.1\r\n\r\nGET /query?terms=bike HTTP/1.1\r\n\r\n")
        .await
        .unwrap();
    client.shutdown().await.unwrap();

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    let text = String::from_utf8_lossy(&out);

    assert_eq!(text.matches("HTTP/1.1 200 OK").count(), 2);
    assert!(matches!(handle.await.unwrap(), Err(ConnectionError::Closed)));
}

#[tokio::test]
async fn test_run_sends_nothing_for_malformed_request() {
    let (mut client, server) = tokio::io::duplex(64 * 1024);
    let router = test_router();

    let handle = tokio::spawn(async move {
        let mut conn = Connection::new(server);
        conn.run(&router).await
    });

    client.write_all(b"GET / HTTP/1.1 junk\r\n\r\n").await.unwrap();

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();

    assert!(out.is_empty());
    assert!(matches!(
        handle.await.unwrap(),
        Err(ConnectionError::Malformed(_))
    ));
}
