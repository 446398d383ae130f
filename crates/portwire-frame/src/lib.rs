//! Length-prefixed packet framing for port channels.
//!
//! Every packet on the channel is framed as:
//! - A 1, 2 or 4 byte big-endian payload length (the header width)
//! - Exactly that many payload bytes
//!
//! The header width is agreed out-of-band with the host and never changes
//! for the lifetime of a channel. Zero-length and over-limit packets are
//! protocol violations, rejected before any payload buffer is allocated.
//!
//! Two ways to use it:
//! - [`FramedStream`] reads and writes one packet at a time on a blocking
//!   stream. The worker's request loop uses this.
//! - [`encode_frame`] and [`decode_frame`] work on in-memory buffers, for
//!   callers that already hold the bytes, such as a host-side driver or a
//!   test parsing a worker's captured stdout.

pub mod codec;
pub mod error;
pub mod stream;

pub use codec::{
    decode_frame, decode_header, encode_frame, encode_header, Frame, FrameConfig, HeaderWidth,
    DEFAULT_HEADER_WIDTH,
};
pub use error::{FrameError, Result};
pub use stream::FramedStream;
