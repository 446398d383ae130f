use crate::codec::HeaderWidth;

/// Errors that can occur during packet framing.
///
/// Every variant except the configuration errors means the channel contract
/// is broken and the byte stream can no longer be trusted.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The stream ended or failed before a full length header was read.
    #[error("incomplete packet header ({received} of {expected} bytes)")]
    InvalidHeader {
        received: usize,
        expected: usize,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The declared packet length is zero or above the channel limit.
    #[error("invalid packet size ({size} bytes, max {max})")]
    InvalidPacketSize { size: u64, max: u64 },

    /// A payload handed to the writer is empty or above the channel limit.
    #[error("outgoing packet size invalid ({size} bytes, max {max})")]
    OutgoingPacketSize { size: u64, max: u64 },

    /// The payload buffer for a packet could not be allocated.
    #[error("failed to allocate {size} byte packet buffer")]
    Allocation { size: u64 },

    /// The stream ended or failed before the full payload was read.
    #[error("truncated packet body ({received} of {expected} bytes)")]
    TruncatedBody {
        received: usize,
        expected: usize,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Writing or flushing a packet failed.
    #[error("packet write failed: {0}")]
    Write(#[source] std::io::Error),

    /// The peer stopped accepting bytes partway through a packet.
    #[error("packet write stalled after {written} of {total} bytes")]
    WriteStalled { written: usize, total: usize },

    /// Header width other than 1, 2 or 4.
    #[error("unsupported header width {0} (expected 1, 2 or 4)")]
    UnsupportedHeaderWidth(u8),

    /// Packet size limit outside `1..=width maximum`.
    #[error("max packet size {max_packet_size} invalid for {width}-byte header")]
    InvalidConfig {
        max_packet_size: u64,
        width: HeaderWidth,
    },
}

pub type Result<T> = std::result::Result<T, FrameError>;
