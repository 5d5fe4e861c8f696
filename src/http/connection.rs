use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::http::parser::parse_request_line;
use crate::http::query::extract_query_param;
use crate::http::request::RequestLine;
use crate::http::response::Response;
use crate::http::sse::SseEvent;
use crate::http::writer::{ResponseWriter, full_write};

/// Query parameter echoed back to the client.
pub const MESSAGE_PARAM: &str = "message";

pub const NO_QUERY_PLACEHOLDER: &str = "[No query parameters provided]";

/// How a connection ended when it ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The peer closed before sending anything. Nothing was written.
    Disconnected,
    /// One SSE event was sent and the connection was held open.
    Streamed,
    /// The fixed 404 was sent.
    NotFound,
}

pub enum ConnectionState {
    Reading,
    Routing(RequestLine),
    SseResponding(RequestLine),
    NotFoundResponding,
    HoldOpen,
    Closed,
}

/// Serves exactly one request on `stream`.
///
/// The stream is never reused; dropping the connection drops the stream.
pub struct Connection<'a, S> {
    stream: S,
    config: &'a Config,
    state: ConnectionState,
    outcome: Outcome,
}

impl<'a, S> Connection<'a, S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: &'a Config) -> Self {
        Self {
            stream,
            config,
            state: ConnectionState::Reading,
            outcome: Outcome::Disconnected,
        }
    }

    pub async fn run(&mut self) -> Result<Outcome> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request_line().await? {
                        Some(line) => ConnectionState::Routing(line),
                        None => {
                            info!("Client disconnected before sending data");
                            self.outcome = Outcome::Disconnected;
                            ConnectionState::Closed
                        }
                    };
                }

                ConnectionState::Routing(line) => {
                    self.state = if line.is_get() && line.path == self.config.endpoint_path {
                        ConnectionState::SseResponding(line)
                    } else {
                        ConnectionState::NotFoundResponding
                    };
                }

                ConnectionState::SseResponding(line) => {
                    let message = echo_message(&line.raw_query);
                    info!(
                        message = %String::from_utf8_lossy(&message),
                        "Client connected to SSE endpoint"
                    );

                    full_write(&mut self.stream, Response::event_stream().to_bytes()).await?;

                    let event = SseEvent::echo(message);
                    full_write(&mut self.stream, event.to_bytes()).await?;
                    debug!(id = %event.id, "Sent SSE event");

                    self.outcome = Outcome::Streamed;
                    self.state = ConnectionState::HoldOpen;
                }

                ConnectionState::NotFoundResponding => {
                    info!("Non-SSE request or unknown path, sending 404");
                    let mut writer = ResponseWriter::new(Response::not_found().to_bytes());
                    writer.write_to_stream(&mut self.stream).await?;

                    self.outcome = Outcome::NotFound;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::HoldOpen => {
                    let hold = self.config.hold_open();
                    debug!(hold_ms = hold.as_millis() as u64, "Keeping connection open");
                    tokio::time::sleep(hold).await;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    debug!("Closing client connection");
                    break;
                }
            }
        }

        Ok(self.outcome)
    }

    /// One bounded read. `None` means the peer closed without sending data.
    async fn read_request_line(&mut self) -> Result<Option<RequestLine>> {
        // Last byte stays unused, like a C-string terminator slot.
        let mut buf = vec![0u8; self.config.buffer_size];
        let limit = self.config.buffer_size - 1;

        let n = self.stream.read(&mut buf[..limit]).await?;
        if n == 0 {
            return Ok(None);
        }

        debug!(
            bytes = n,
            request = %String::from_utf8_lossy(&buf[..n]),
            "Received request"
        );

        Ok(Some(parse_request_line(&buf[..n])))
    }
}

/// Serves one request on `stream` and drops it.
pub async fn handle_connection<S>(stream: S, config: &Config) -> Result<Outcome>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    Connection::new(stream, config).run().await
}

/// Chooses the bytes echoed back for a raw query string.
///
/// An empty `message` value is only replaced by a placeholder when the query
/// does not contain `message=` at all, so `message=` alone echoes "".
pub fn echo_message(raw_query: &[u8]) -> Vec<u8> {
    let message = extract_query_param(raw_query, MESSAGE_PARAM);
    if !message.is_empty() {
        return message;
    }

    if raw_query.is_empty() {
        NO_QUERY_PLACEHOLDER.as_bytes().to_vec()
    } else if !contains(raw_query, b"message=") {
        [
            format!("[Query param '{}' not found or empty in '", MESSAGE_PARAM).as_bytes(),
            raw_query,
            &b"']"[..],
        ]
        .concat()
    } else {
        message
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
