/// Errors raised while encoding a term.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("atom name too long ({chars} characters, max {max})")]
    AtomTooLong { chars: usize, max: usize },

    #[error("tuple arity {0} exceeds the format limit")]
    TupleTooLarge(usize),

    #[error("string of {0} bytes exceeds the format limit")]
    StringTooLong(usize),

    #[error("term nesting deeper than {max} levels")]
    TooDeep { max: usize },
}

/// Errors raised while decoding a payload.
///
/// These are recoverable: the frame around the payload was well formed, only
/// its content is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("unexpected version byte {found} (expected {expected})")]
    VersionMismatch { found: u8, expected: u8 },

    #[error("truncated term ({needed} bytes needed, {remaining} remaining)")]
    Truncated { needed: usize, remaining: usize },

    #[error("unknown term tag {0}")]
    UnknownTag(u8),

    #[error("atom name is not valid UTF-8")]
    InvalidAtom,

    #[error("atom name too long ({chars} characters, max {max})")]
    AtomTooLong { chars: usize, max: usize },

    #[error("list is not a proper list of bytes")]
    UnsupportedList,

    #[error("{0} trailing bytes after term")]
    TrailingBytes(usize),

    #[error("term nesting deeper than {max} levels")]
    TooDeep { max: usize },
}
