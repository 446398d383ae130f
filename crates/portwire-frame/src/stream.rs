use std::io::{ErrorKind, Read, Write};

use bytes::BytesMut;

use crate::codec::{decode_header, encode_frame, Frame, FrameConfig};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Consecutive writes allowed to make no progress before the peer is
/// considered gone.
const MAX_STALLED_WRITES: usize = 16;

/// Reads and writes whole packets on a blocking duplex stream.
///
/// Exactly one packet is read per [`read_frame`](Self::read_frame) call; no
/// bytes beyond the declared length are consumed, so nothing is buffered
/// between requests.
pub struct FramedStream<S> {
    inner: S,
    out: BytesMut,
    config: FrameConfig,
}

impl<S> FramedStream<S> {
    /// Create a framed stream with the default configuration.
    pub fn new(inner: S) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a framed stream with explicit configuration.
    pub fn with_config(inner: S, config: FrameConfig) -> Self {
        Self {
            inner,
            out: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consume the framed stream and return the inner stream.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Current channel configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl<S: Read> FramedStream<S> {
    /// Read the next complete packet (blocking).
    ///
    /// The declared length is validated before the payload buffer is
    /// allocated, and the allocation itself is fallible.
    pub fn read_frame(&mut self) -> Result<Frame> {
        let width = self.config.header_width.bytes();
        let mut header = [0u8; 4];
        let header = &mut header[..width];

        fill(&mut self.inner, header).map_err(|short| FrameError::InvalidHeader {
            received: short.received,
            expected: width,
            source: short.source,
        })?;

        let size = decode_header(header);
        self.config.check_size(size)?;

        let len = usize::try_from(size).map_err(|_| FrameError::Allocation { size })?;
        let mut payload = Vec::new();
        payload
            .try_reserve_exact(len)
            .map_err(|_| FrameError::Allocation { size })?;

        // the reservation stays untouched until body bytes arrive
        let read = (&mut self.inner).take(size).read_to_end(&mut payload);
        if read.is_err() || payload.len() < len {
            return Err(FrameError::TruncatedBody {
                received: payload.len(),
                expected: len,
                source: read.err(),
            });
        }

        tracing::trace!(size = len, "packet received");
        Ok(Frame::new(payload))
    }
}

impl<S: Write> FramedStream<S> {
    /// Write a complete frame (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.send(frame.payload.as_ref())
    }

    /// Frame and send a payload, then flush.
    ///
    /// Header and payload go out from one buffer; the call returns only once
    /// every byte has been accepted by the stream.
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.out.clear();
        encode_frame(&self.config, payload, &mut self.out)?;

        let total = self.out.len();
        let mut offset = 0usize;
        let mut stalls = 0usize;
        while offset < total {
            match self.inner.write(&self.out[offset..]) {
                Ok(0) => stalls += 1,
                Ok(n) => {
                    offset += n;
                    stalls = 0;
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => stalls += 1,
                Err(err) => return Err(FrameError::Write(err)),
            }
            if stalls >= MAX_STALLED_WRITES {
                return Err(FrameError::WriteStalled {
                    written: offset,
                    total,
                });
            }
        }

        self.flush()?;
        tracing::trace!(size = payload.len(), "packet sent");
        Ok(())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Write(err)),
            }
        }
    }
}

struct ShortRead {
    received: usize,
    source: Option<std::io::Error>,
}

/// Fill `buf` completely, retrying interrupted reads.
fn fill<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> std::result::Result<(), ShortRead> {
    let mut received = 0usize;
    while received < buf.len() {
        match src.read(&mut buf[received..]) {
            Ok(0) => {
                return Err(ShortRead {
                    received,
                    source: None,
                })
            }
            Ok(n) => received += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => {
                return Err(ShortRead {
                    received,
                    source: Some(err),
                })
            }
        }
    }
    Ok(())
}
