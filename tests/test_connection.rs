use std::io;
use std::time::{Duration, Instant};

use sse_echo::config::Config;
use sse_echo::error::Error;
use sse_echo::http::connection::{NO_QUERY_PLACEHOLDER, Outcome, echo_message, handle_connection};
use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex};
use tokio_test::io::Builder;

const NOT_FOUND: &[u8] =
    b"HTTP/1.1 404 Not Found\r\nContent-Type: text/plain\r\nContent-Length: 9\r\nConnection: close\r\n\r\nNot Found";

const SSE_HEAD: &str = "HTTP/1.1 200 OK\r\n\
Content-Type: text/event-stream\r\n\
Cache-Control: no-cache\r\n\
Connection: keep-alive\r\n\
Access-Control-Allow-Origin: *\r\n\
\r\n";

fn quick_config() -> Config {
    Config {
        hold_open_ms: 0,
        ..Config::default()
    }
}

/// Sends `request`, runs the handler to completion and returns what the
/// client received.
async fn exchange(request: &[u8], cfg: &Config) -> (Outcome, String) {
    let (mut client, server) = duplex(4096);
    client.write_all(request).await.unwrap();

    let outcome = handle_connection(server, cfg).await.unwrap();

    let mut received = Vec::new();
    client.read_to_end(&mut received).await.unwrap();
    (outcome, String::from_utf8(received).unwrap())
}

fn data_line(response: &str) -> &str {
    response
        .lines()
        .find_map(|line| line.strip_prefix("data: "))
        .expect("response has a data line")
}

#[tokio::test]
async fn test_sse_echoes_message() {
    let (outcome, response) =
        exchange(b"GET /events?message=Hi HTTP/1.1\r\n\r\n", &quick_config()).await;

    assert_eq!(outcome, Outcome::Streamed);
    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert_eq!(data_line(&response), "Hi");
}

#[tokio::test]
async fn test_sse_exact_layout() {
    let (_, response) = exchange(
        b"GET /events?message=Hello+World HTTP/1.1\r\nHost: localhost\r\n\r\n",
        &quick_config(),
    )
    .await;

    let event = response.strip_prefix(SSE_HEAD).expect("exact SSE head");
    let mut lines = event.split('\n');

    let id = lines.next().unwrap().strip_prefix("id: ").unwrap();
    assert!(id.parse::<u128>().unwrap() > 0);
    assert_eq!(lines.next(), Some("event: messageEcho"));
    assert_eq!(lines.next(), Some("data: Hello World"));
    assert_eq!(lines.next(), Some(""));
    assert_eq!(lines.next(), Some(""));
    assert_eq!(lines.next(), None);
}

#[tokio::test]
async fn test_sse_without_query_uses_placeholder() {
    let (_, response) = exchange(b"GET /events HTTP/1.1\r\n\r\n", &quick_config()).await;

    assert_eq!(data_line(&response), NO_QUERY_PLACEHOLDER);
}

#[tokio::test]
async fn test_sse_unknown_param_names_query() {
    let (_, response) = exchange(b"GET /events?foo=bar HTTP/1.1\r\n\r\n", &quick_config()).await;

    assert_eq!(
        data_line(&response),
        "[Query param 'message' not found or empty in 'foo=bar']"
    );
}

#[tokio::test]
async fn test_sse_empty_message_echoes_empty() {
    let (outcome, response) =
        exchange(b"GET /events?message= HTTP/1.1\r\n\r\n", &quick_config()).await;

    assert_eq!(outcome, Outcome::Streamed);
    assert!(response.contains("\ndata: \n\n"));
}

#[tokio::test]
async fn test_sse_decodes_percent_escapes() {
    let (_, response) = exchange(
        b"GET /events?a=1&message=50%25+off HTTP/1.1\r\n\r\n",
        &quick_config(),
    )
    .await;

    assert_eq!(data_line(&response), "50% off");
}

#[tokio::test]
async fn test_unknown_path_gets_exact_not_found() {
    let mut stream = Builder::new()
        .read(b"GET /nope HTTP/1.1\r\n\r\n")
        .write(NOT_FOUND)
        .build();

    let outcome = handle_connection(&mut stream, &Config::default()).await.unwrap();

    assert_eq!(outcome, Outcome::NotFound);
}

#[tokio::test]
async fn test_wrong_method_gets_not_found() {
    let (outcome, response) =
        exchange(b"POST /events?message=Hi HTTP/1.1\r\n\r\n", &quick_config()).await;

    assert_eq!(outcome, Outcome::NotFound);
    assert_eq!(response.as_bytes(), NOT_FOUND);
}

#[tokio::test]
async fn test_garbage_gets_not_found() {
    let (outcome, response) = exchange(b"hello\r\n", &quick_config()).await;

    assert_eq!(outcome, Outcome::NotFound);
    assert_eq!(response.as_bytes(), NOT_FOUND);
}

#[tokio::test]
async fn test_path_must_match_exactly() {
    let (outcome, _) = exchange(b"GET /events/ HTTP/1.1\r\n\r\n", &quick_config()).await;

    assert_eq!(outcome, Outcome::NotFound);
}

#[tokio::test]
async fn test_custom_endpoint_path() {
    let cfg = Config {
        endpoint_path: "/stream".to_string(),
        ..quick_config()
    };

    let (outcome, _) = exchange(b"GET /stream?message=x HTTP/1.1\r\n\r\n", &cfg).await;
    assert_eq!(outcome, Outcome::Streamed);

    let (outcome, _) = exchange(b"GET /events?message=x HTTP/1.1\r\n\r\n", &cfg).await;
    assert_eq!(outcome, Outcome::NotFound);
}

#[tokio::test]
async fn test_read_is_bounded_by_buffer_size() {
    // Seven bytes fit: "GET /ev"
    let cfg = Config {
        buffer_size: 8,
        ..quick_config()
    };

    let (outcome, _) = exchange(b"GET /events HTTP/1.1\r\n\r\n", &cfg).await;

    assert_eq!(outcome, Outcome::NotFound);
}

#[tokio::test]
async fn test_zero_byte_read_sends_nothing() {
    let (mut client, server) = duplex(1024);
    client.shutdown().await.unwrap();

    let outcome = handle_connection(server, &Config::default()).await.unwrap();
    assert_eq!(outcome, Outcome::Disconnected);

    let mut received = Vec::new();
    client.read_to_end(&mut received).await.unwrap();
    assert!(received.is_empty());
}

#[tokio::test]
async fn test_read_error_propagates() {
    let mut stream = Builder::new()
        .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        .build();

    let err = handle_connection(&mut stream, &Config::default()).await.unwrap_err();

    assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::ConnectionReset));
}

#[tokio::test]
async fn test_write_error_aborts_handler() {
    let mut stream = Builder::new()
        .read(b"GET /nope HTTP/1.1\r\n\r\n")
        .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone"))
        .build();

    let err = handle_connection(&mut stream, &Config::default()).await.unwrap_err();

    assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
}

#[tokio::test]
async fn test_sse_holds_connection_open() {
    let cfg = Config {
        hold_open_ms: 200,
        ..Config::default()
    };

    let start = Instant::now();
    let (outcome, _) = exchange(b"GET /events?message=Hi HTTP/1.1\r\n\r\n", &cfg).await;

    assert_eq!(outcome, Outcome::Streamed);
    assert!(start.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_not_found_does_not_hold() {
    let cfg = Config::default();

    let result = tokio::time::timeout(
        Duration::from_secs(2),
        exchange(b"GET /nope HTTP/1.1\r\n\r\n", &cfg),
    )
    .await;

    let (outcome, _) = result.expect("404 returns before the hold-open delay");
    assert_eq!(outcome, Outcome::NotFound);
}

#[tokio::test]
async fn test_sse_echoes_non_utf8_bytes() {
    let (mut client, server) = duplex(4096);
    client
        .write_all(b"GET /events?message=%FEok HTTP/1.1\r\n\r\n")
        .await
        .unwrap();

    let outcome = handle_connection(server, &quick_config()).await.unwrap();
    assert_eq!(outcome, Outcome::Streamed);

    let mut received = Vec::new();
    client.read_to_end(&mut received).await.unwrap();
    assert!(received.starts_with(SSE_HEAD.as_bytes()));
    assert!(received.ends_with(b"\nevent: messageEcho\ndata: \xFEok\n\n"));
}

#[test]
fn test_echo_message_policy() {
    assert_eq!(echo_message(b"message=Hello"), b"Hello");
    assert_eq!(echo_message(b""), NO_QUERY_PLACEHOLDER.as_bytes());
    assert_eq!(
        echo_message(b"msg="),
        b"[Query param 'message' not found or empty in 'msg=']"
    );
    assert_eq!(echo_message(b"message="), b"");
    assert_eq!(echo_message(b"a=1&message="), b"");
    assert_eq!(
        echo_message(b"x=1"),
        b"[Query param 'message' not found or empty in 'x=1']"
    );
}

#[test]
fn test_echo_message_placeholder_keeps_raw_query_bytes() {
    assert_eq!(
        echo_message(b"k=\xFF\xFF"),
        b"[Query param 'message' not found or empty in 'k=\xFF\xFF']"
    );
}
