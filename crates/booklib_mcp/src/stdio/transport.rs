//! Line-delimited JSON transport.
//!
//! Each JSON-RPC message is a single line terminated by `\n`. stdout carries
//! protocol traffic only; logs go to stderr or files.

use log::trace;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::TransportError;

/// Reads messages from `R`, writes responses to `W`.
///
/// Generic over reader/writer so tests can drive it from memory.
pub struct StdioTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Reads the next line with surrounding whitespace removed.
    ///
    /// Returns `None` on EOF and `Some("")` for a blank line.
    pub async fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        let mut line = String::new();
        let bytes_read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(|e| TransportError::Read(e.to_string()))?;

        if bytes_read == 0 {
            return Ok(None);
        }

        let trimmed = line.trim();
        trace!("event=stdio_read module=mcp len={}", trimmed.len());
        Ok(Some(trimmed.to_string()))
    }

    /// Writes one message followed by `\n` and flushes.
    pub async fn write_line(&mut self, message: &str) -> Result<(), TransportError> {
        trace!("event=stdio_write module=mcp len={}", message.len());

        let mut framed = Vec::with_capacity(message.len() + 1);
        framed.extend_from_slice(message.as_bytes());
        framed.push(b'\n');

        self.writer
            .write_all(&framed)
            .await
            .map_err(|e| TransportError::Write(e.to_string()))?;
        self.writer
            .flush()
            .await
            .map_err(|e| TransportError::Write(e.to_string()))
    }

    /// Consumes the transport and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn reads_lines_until_eof() {
        let reader = Cursor::new(b"first\n  \nsecond\r\n".to_vec());
        let mut transport = StdioTransport::new(reader, Vec::new());

        assert_eq!(transport.read_line().await.unwrap(), Some("first".into()));
        assert_eq!(transport.read_line().await.unwrap(), Some(String::new()));
        assert_eq!(transport.read_line().await.unwrap(), Some("second".into()));
        assert_eq!(transport.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_appends_newline() {
        let mut transport = StdioTransport::new(Cursor::new(Vec::new()), Vec::new());
        transport.write_line("{\"ok\":true}").await.unwrap();

        let output = String::from_utf8(transport.into_writer()).unwrap();
        assert_eq!(output, "{\"ok\":true}\n");
    }
}
