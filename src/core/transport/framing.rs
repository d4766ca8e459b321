//! Content-Length message framing.
//!
//! Every message on the wire is one frame:
//!
//! ```text
//! Content-Length: <N>\r\n
//! \r\n
//! <N bytes of UTF-8 JSON>
//! ```
//!
//! The header key is matched case-insensitively; any other header lines are
//! ignored. [`FrameReader`] pulls exactly one frame per call and leaves the
//! rest of the stream untouched for the next call.

use serde::Serialize;
use serde_json::Value;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};

use super::{FramingError, TransportError, TransportResult};

/// Sequence terminating the header block.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Largest header block accepted, terminator included.
pub const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Largest body accepted.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Serialize a message and prefix it with its `Content-Length` header.
pub fn encode_frame<T: Serialize + ?Sized>(message: &T) -> Result<Vec<u8>, serde_json::Error> {
    let body = serde_json::to_vec(message)?;
    let header = format!("Content-Length: {}\r\n\r\n", body.len());

    let mut frame = Vec::with_capacity(header.len() + body.len());
    frame.extend_from_slice(header.as_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Extract the body length from a header block.
///
/// Only the first `Content-Length` line counts. The value must be a positive
/// integer no larger than [`MAX_BODY_BYTES`].
pub fn parse_content_length(header: &[u8]) -> Result<usize, FramingError> {
    let text = String::from_utf8_lossy(header);

    let value = text
        .split("\r\n")
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
        .map(|(_, value)| value.trim())
        .ok_or(FramingError::MissingContentLength)?;

    let length: usize = value
        .parse()
        .map_err(|_| FramingError::InvalidContentLength(value.to_string()))?;

    if length == 0 {
        return Err(FramingError::InvalidContentLength(value.to_string()));
    }
    if length > MAX_BODY_BYTES {
        return Err(FramingError::BodyTooLarge {
            length,
            limit: MAX_BODY_BYTES,
        });
    }
    Ok(length)
}

/// Reads frames from a byte stream.
pub struct FrameReader<R> {
    reader: BufReader<R>,
    header: Vec<u8>,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Wrap a readable stream.
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            header: Vec::with_capacity(64),
        }
    }

    /// Wait until the next frame has started arriving or the stream has ended.
    ///
    /// Nothing is consumed, so this is cancel-safe: dropping the future never
    /// loses bytes. Once it resolves, [`read_frame`](Self::read_frame) picks up
    /// the buffered data.
    pub async fn wait_readable(&mut self) -> TransportResult<()> {
        self.reader.fill_buf().await?;
        Ok(())
    }

    /// Read the next frame and parse its body as JSON.
    ///
    /// Returns `Ok(None)` when the stream ends cleanly between frames.
    pub async fn read_frame(&mut self) -> TransportResult<Option<Value>> {
        let Some(length) = self.read_header().await? else {
            return Ok(None);
        };
        let body = self.read_body(length).await?;
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(TransportError::Parse)
    }

    /// Read up to and including the header terminator; return the body length.
    async fn read_header(&mut self) -> TransportResult<Option<usize>> {
        self.header.clear();

        loop {
            let budget = MAX_HEADER_BYTES - self.header.len();
            if budget == 0 {
                return Err(FramingError::HeaderTooLarge {
                    limit: MAX_HEADER_BYTES,
                }
                .into());
            }

            let read = (&mut self.reader)
                .take(budget as u64)
                .read_until(b'\n', &mut self.header)
                .await?;

            if read == 0 {
                if self.header.is_empty() {
                    return Ok(None);
                }
                return Err(FramingError::UnterminatedHeader.into());
            }

            if self.header.ends_with(HEADER_TERMINATOR) {
                break;
            }
        }

        Ok(Some(parse_content_length(&self.header)?))
    }

    /// Read exactly `length` body bytes.
    async fn read_body(&mut self, length: usize) -> TransportResult<Vec<u8>> {
        let mut body = Vec::with_capacity(length);
        let received = (&mut self.reader)
            .take(length as u64)
            .read_to_end(&mut body)
            .await?;

        if received < length {
            return Err(FramingError::TruncatedBody {
                expected: length,
                received,
            }
            .into());
        }
        Ok(body)
    }
}

/// Writes frames to a byte stream.
pub struct FrameWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    /// Wrap a writable stream.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Encode, write and flush one frame.
    pub async fn write_frame<T: Serialize + ?Sized>(&mut self, message: &T) -> TransportResult<()> {
        let frame = encode_frame(message)?;
        self.writer.write_all(&frame).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Shut down the write half of the stream.
    pub async fn shutdown(&mut self) -> TransportResult<()> {
        self.writer.shutdown().await?;
        Ok(())
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
