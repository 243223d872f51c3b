//! Reassembles newline-delimited samples from an arbitrarily fragmented byte
//! stream. The accumulation buffer carries partial frames across reads, so
//! what comes out never depends on how the transport chunked the data.

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use crate::types::Sample;

/// Frames are newline-terminated (0x0A).
const FRAME_DELIMITER: u8 = b'\n';

/// Upper bound on a single read from the transport.
const READ_CHUNK: usize = 1024;

/// Pure accumulation buffer: feed it chunks, drain complete samples.
#[derive(Default)]
pub struct FrameBuffer {
    buf: BytesMut,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(READ_CHUNK * 2),
        }
    }

    /// Append a chunk read from the transport.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Bytes held back waiting for a delimiter.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Drain the next complete, well-formed sample, if any. Blank candidates
    /// are skipped; malformed ones are logged and dropped. One corrupt line
    /// must never poison the rest of the stream.
    pub fn next_sample(&mut self) -> Option<Sample> {
        while let Some(pos) = self.buf.iter().position(|&b| b == FRAME_DELIMITER) {
            let candidate = self.buf.split_to(pos + 1);
            let line = candidate[..pos].trim_ascii();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_slice::<Sample>(line) {
                Ok(sample) => return Some(sample),
                Err(e) => warn!("discarding malformed frame: {e}"),
            }
        }
        None
    }
}

/// Async shell around [`FrameBuffer`]: reads bounded chunks off the
/// transport and yields reconstructed samples.
pub struct FrameReader<R> {
    inner: R,
    buf: FrameBuffer,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: FrameBuffer::new(),
        }
    }

    /// Next decoded sample, or `None` once the peer has closed the stream.
    /// Unterminated trailing bytes at close are discarded, not force-decoded.
    pub async fn next_sample(&mut self) -> std::io::Result<Option<Sample>> {
        loop {
            if let Some(sample) = self.buf.next_sample() {
                return Ok(Some(sample));
            }
            let mut chunk = [0u8; READ_CHUNK];
            let n = self.inner.read(&mut chunk).await?;
            if n == 0 {
                let leftover = self.buf.buffered();
                if leftover > 0 {
                    warn!("stream closed with {leftover} unterminated bytes, discarding");
                } else {
                    debug!("stream closed");
                }
                return Ok(None);
            }
            self.buf.extend(&chunk[..n]);
        }
    }
}
