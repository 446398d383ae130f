use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Header width used when the host does not say otherwise (`{packet, 4}`).
pub const DEFAULT_HEADER_WIDTH: HeaderWidth = HeaderWidth::Four;

/// Number of bytes carrying the big-endian packet length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderWidth {
    One,
    Two,
    #[default]
    Four,
}

impl HeaderWidth {
    /// Header size in bytes.
    pub const fn bytes(self) -> usize {
        match self {
            HeaderWidth::One => 1,
            HeaderWidth::Two => 2,
            HeaderWidth::Four => 4,
        }
    }

    /// Largest length representable in this header: `2^(8·width) - 1`.
    pub const fn max_length(self) -> u64 {
        (1u64 << (8 * self.bytes())) - 1
    }
}

impl TryFrom<u8> for HeaderWidth {
    type Error = FrameError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(HeaderWidth::One),
            2 => Ok(HeaderWidth::Two),
            4 => Ok(HeaderWidth::Four),
            other => Err(FrameError::UnsupportedHeaderWidth(other)),
        }
    }
}

impl fmt::Display for HeaderWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bytes())
    }
}

/// One packet received from or destined for the host.
///
/// The payload is never empty and never longer than the channel limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The packet payload.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Always false for frames read off a channel.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self, width: HeaderWidth) -> usize {
        width.bytes() + self.payload.len()
    }
}

/// Configuration for a framed channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Length header width. Default: 4 bytes.
    pub header_width: HeaderWidth,
    /// Largest accepted payload. Default: the header width maximum.
    pub max_packet_size: u64,
}

impl FrameConfig {
    /// Configuration allowing every length the header can express.
    pub const fn new(header_width: HeaderWidth) -> Self {
        Self {
            header_width,
            max_packet_size: header_width.max_length(),
        }
    }

    /// Lower the packet size limit.
    pub fn with_max_packet_size(mut self, max_packet_size: u64) -> Self {
        self.max_packet_size = max_packet_size;
        self
    }

    /// Check that the limit is non-zero and representable in the header.
    pub fn validate(&self) -> Result<()> {
        if self.max_packet_size == 0 || self.max_packet_size > self.header_width.max_length() {
            return Err(FrameError::InvalidConfig {
                max_packet_size: self.max_packet_size,
                width: self.header_width,
            });
        }
        Ok(())
    }

    /// Reject sizes of zero or above the limit.
    pub fn check_size(&self, size: u64) -> Result<()> {
        if size == 0 || size > self.max_packet_size {
            return Err(FrameError::InvalidPacketSize {
                size,
                max: self.max_packet_size,
            });
        }
        Ok(())
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_WIDTH)
    }
}

/// Encode a length header, big-endian, into `dst`.
pub fn encode_header(width: HeaderWidth, len: usize, dst: &mut BytesMut) -> Result<()> {
    let size = len as u64;
    if size > width.max_length() {
        return Err(FrameError::InvalidPacketSize {
            size,
            max: width.max_length(),
        });
    }
    let be = size.to_be_bytes();
    dst.put_slice(&be[be.len() - width.bytes()..]);
    Ok(())
}

/// Interpret a full header as a big-endian unsigned length.
pub fn decode_header(header: &[u8]) -> u64 {
    debug_assert!(header.len() <= 8);
    header
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────────────┬──────────────────┐
/// │ Length (1/2/4B BE)   │ Payload          │
/// │                      │ (Length bytes)   │
/// └──────────────────────┴──────────────────┘
/// ```
pub fn encode_frame(config: &FrameConfig, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let size = payload.len() as u64;
    config
        .check_size(size)
        .map_err(|_| FrameError::OutgoingPacketSize {
            size,
            max: config.max_packet_size,
        })?;
    dst.reserve(config.header_width.bytes() + payload.len());
    encode_header(config.header_width, payload.len(), dst)?;
    dst.put_slice(payload);
    Ok(())
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(config: &FrameConfig, src: &mut BytesMut) -> Result<Option<Frame>> {
    let width = config.header_width.bytes();
    if src.len() < width {
        return Ok(None);
    }

    let size = decode_header(&src[..width]);
    config.check_size(size)?;

    // check_size bounds `size` by a header maximum of at most u32::MAX
    let payload_len = size as usize;
    if src.len() < width + payload_len {
        return Ok(None);
    }

    src.advance(width);
    let payload = src.split_to(payload_len).freeze();

    Ok(Some(Frame { payload }))
}
