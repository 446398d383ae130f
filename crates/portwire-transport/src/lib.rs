//! Blocking duplex byte stream abstraction.
//!
//! A port worker talks to its host over a pair of inherited byte streams:
//! requests arrive on standard input, responses leave on standard output.
//! This crate models that pair as a single [`DuplexStream`] and provides
//! [`StdioStream`], the native implementation for the current platform.
//!
//! This is the lowest layer of portwire. Framing builds on top of any
//! [`DuplexStream`], which keeps the upper layers testable over in-memory
//! buffers via [`Duplex`].

pub mod error;
pub mod stdio;
pub mod traits;

pub use error::{Result, TransportError};
pub use stdio::StdioStream;
pub use traits::{Duplex, DuplexStream};
