//! Newline-delimited JSON message channel.
//!
//! One frame per line, as used by the MCP stdio transport. The same channel
//! runs over stdin/stdout, a TCP stream, or an in-memory pipe in tests.

use std::time::Duration;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error};

use super::{ChannelConfig, TransportError, TransportResult};

/// Pause after a failed read so a persistently broken stream doesn't spin.
const IO_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// What a single read from the channel produced.
#[derive(Debug)]
pub enum ChannelEvent {
    /// A complete, non-empty text frame.
    Message(String),
    /// A transport-level fault; the channel is still usable.
    Fault(TransportError),
    /// The peer closed the channel (or it is unrecoverably broken).
    Closed,
}

/// Bidirectional framed channel over an async reader/writer pair.
pub struct MessageChannel<R, W> {
    reader: R,
    writer: W,
    /// Bytes of the frame being read; kept across cancelled reads.
    buf: Vec<u8>,
    /// Bytes skipped so far of a frame that went over the size limit.
    discarded: usize,
    consecutive_io_errors: u32,
    max_io_errors: u32,
    max_frame_bytes: usize,
}

/// One raw read result, before decoding.
enum Frame {
    Line(Vec<u8>),
    Oversized(usize),
    Eof,
}

impl<R, W> MessageChannel<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a channel with default settings.
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_config(reader, writer, &ChannelConfig::default())
    }

    /// Create a channel with the given settings.
    pub fn with_config(reader: R, writer: W, config: &ChannelConfig) -> Self {
        Self {
            reader,
            writer,
            buf: Vec::new(),
            discarded: 0,
            consecutive_io_errors: 0,
            max_io_errors: config.max_consecutive_io_errors.max(1),
            max_frame_bytes: config.max_frame_bytes.max(1),
        }
    }

    /// Read until the next frame, fault, or closure.
    ///
    /// Cancel safe: a partially read frame stays buffered for the next call.
    pub async fn next_event(&mut self) -> ChannelEvent {
        loop {
            match self.read_frame().await {
                Ok(Frame::Eof) => return ChannelEvent::Closed,
                Ok(Frame::Oversized(len)) => {
                    self.consecutive_io_errors = 0;
                    return ChannelEvent::Fault(TransportError::framing(format!(
                        "dropped frame of {} bytes, limit is {}",
                        len, self.max_frame_bytes
                    )));
                }
                Ok(Frame::Line(frame)) => {
                    self.consecutive_io_errors = 0;
                    match String::from_utf8(frame) {
                        Ok(text) => {
                            let text = text.trim();
                            if text.is_empty() {
                                continue;
                            }
                            debug!("<- {}", text);
                            return ChannelEvent::Message(text.to_string());
                        }
                        Err(e) => {
                            return ChannelEvent::Fault(TransportError::framing(format!(
                                "frame is not valid UTF-8: {}",
                                e
                            )));
                        }
                    }
                }
                Err(e) => {
                    self.buf.clear();
                    self.discarded = 0;
                    self.consecutive_io_errors += 1;
                    if self.consecutive_io_errors >= self.max_io_errors {
                        error!(
                            "Giving up on channel after {} consecutive read errors: {}",
                            self.consecutive_io_errors, e
                        );
                        return ChannelEvent::Closed;
                    }
                    tokio::time::sleep(IO_ERROR_BACKOFF).await;
                    return ChannelEvent::Fault(TransportError::IoError(e));
                }
            }
        }
    }

    /// Read one newline-terminated frame, holding at most `max_frame_bytes`.
    ///
    /// An unterminated frame at end of stream is still returned.
    async fn read_frame(&mut self) -> std::io::Result<Frame> {
        loop {
            let available = self.reader.fill_buf().await?;

            if available.is_empty() {
                if self.discarded > 0 {
                    return Ok(Frame::Oversized(std::mem::take(&mut self.discarded)));
                }
                if self.buf.is_empty() {
                    return Ok(Frame::Eof);
                }
                return Ok(Frame::Line(std::mem::take(&mut self.buf)));
            }

            let (len, complete) = match available.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (available.len(), false),
            };

            if self.discarded > 0 || self.buf.len() + len > self.max_frame_bytes {
                self.discarded += self.buf.len() + len;
                self.buf.clear();
            } else {
                self.buf.extend_from_slice(&available[..len]);
            }
            self.reader.consume(len);

            if complete {
                if self.discarded > 0 {
                    return Ok(Frame::Oversized(std::mem::take(&mut self.discarded)));
                }
                return Ok(Frame::Line(std::mem::take(&mut self.buf)));
            }
        }
    }

    /// Serialize `message` and write it as one frame.
    pub async fn send<T: Serialize>(&mut self, message: &T) -> TransportResult<()> {
        let mut frame = serde_json::to_vec(message)?;
        frame.push(b'\n');
        self.writer.write_all(&frame).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Flush and close the write side.
    pub async fn close(&mut self) -> TransportResult<()> {
        self.writer.flush().await?;
        self.writer.shutdown().await?;
        Ok(())
    }
}
