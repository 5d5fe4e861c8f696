use std::io;

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::Result;

/// Writes a buffer to a stream until every byte is accepted.
pub struct ResponseWriter {
    buffer: Bytes,
    written: usize,
}

impl ResponseWriter {
    pub fn new(buffer: impl Into<Bytes>) -> Self {
        Self {
            buffer: buffer.into(),
            written: 0,
        }
    }

    /// Bytes accepted by the stream so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Retries interrupted writes without limit. A write that accepts zero
    /// bytes while data remains means the peer is gone and fails with
    /// `WriteZero`.
    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            match stream.write(&self.buffer[self.written..]).await {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "connection closed while writing",
                    )
                    .into());
                }
                Ok(n) => self.written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        stream.flush().await?;
        Ok(())
    }
}

/// Writes all of `data` to `stream`.
pub async fn full_write<W>(stream: &mut W, data: impl Into<Bytes>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    ResponseWriter::new(data).write_to_stream(stream).await
}
