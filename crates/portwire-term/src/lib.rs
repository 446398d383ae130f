//! A small subset of the host's external term format.
//!
//! Three kinds of term cross the port channel: atoms, fixed-arity tuples and
//! byte strings. Every top-level message starts with the version marker
//! ([`tags::VERSION_MAGIC`]) followed by exactly one term.
//!
//! Encoding is deterministic. Decoding is its exact inverse and validates
//! every declared length against the bytes actually present.

pub mod decode;
pub mod encode;
pub mod error;
pub mod tags;
pub mod term;

pub use decode::decode_term;
pub use encode::{encode_term, encode_term_into};
pub use error::{DecodeError, EncodeError};
pub use term::Term;
