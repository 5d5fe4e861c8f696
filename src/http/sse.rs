//! Server-Sent Events framing.

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::{BufMut, Bytes, BytesMut};

/// Event name used for echoed messages.
pub const ECHO_EVENT: &str = "messageEcho";

/// A single SSE event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub id: u128,
    pub event: String,
    /// Written verbatim, including bytes that are not valid UTF-8.
    pub data: Bytes,
}

impl SseEvent {
    /// An echo event stamped with the current wall-clock time in nanoseconds.
    pub fn echo(data: impl Into<Bytes>) -> Self {
        Self {
            id: now_nanos(),
            event: ECHO_EVENT.to_string(),
            data: data.into(),
        }
    }

    /// Encodes the event as `id`, `event` and `data` fields, each ending in
    /// `\n`, followed by the blank line that terminates the event.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(48 + self.event.len() + self.data.len());
        buf.put_slice(format!("id: {}\n", self.id).as_bytes());
        buf.put_slice(format!("event: {}\n", self.event).as_bytes());
        buf.put_slice(b"data: ");
        buf.put_slice(&self.data);
        buf.put_slice(b"\n\n");
        buf.freeze()
    }
}

fn now_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_event_fields_in_order() {
        let event = SseEvent {
            id: 42,
            event: ECHO_EVENT.to_string(),
            data: Bytes::from_static(b"Hi"),
        };

        assert_eq!(
            &event.to_bytes()[..],
            b"id: 42\nevent: messageEcho\ndata: Hi\n\n"
        );
    }

    #[test]
    fn echo_ids_are_wall_clock_nanos() {
        let before = now_nanos();
        let event = SseEvent::echo("x");
        assert!(event.id >= before);
        assert_eq!(event.event, ECHO_EVENT);
    }

    #[test]
    fn data_bytes_are_not_reencoded() {
        let event = SseEvent {
            id: 1,
            event: ECHO_EVENT.to_string(),
            data: Bytes::from_static(b"\xFEok"),
        };

        assert!(event.to_bytes().ends_with(b"data: \xFEok\n\n"));
    }
}
