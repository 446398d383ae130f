//! Tag bytes of the external term format.

/// Leading byte of every encoded message.
pub const VERSION_MAGIC: u8 = 131;

pub const SMALL_INTEGER_EXT: u8 = 97;
pub const ATOM_EXT: u8 = 100;
pub const SMALL_TUPLE_EXT: u8 = 104;
pub const LARGE_TUPLE_EXT: u8 = 105;
pub const NIL_EXT: u8 = 106;
pub const STRING_EXT: u8 = 107;
pub const LIST_EXT: u8 = 108;
pub const SMALL_ATOM_EXT: u8 = 115;
pub const ATOM_UTF8_EXT: u8 = 118;
pub const SMALL_ATOM_UTF8_EXT: u8 = 119;

/// Longest atom name, in characters.
pub const MAX_ATOM_CHARACTERS: usize = 255;

/// Longest string carried as `STRING_EXT`; longer ones become byte lists.
pub const MAX_STRING_EXT_LEN: usize = u16::MAX as usize;

/// Deepest tuple nesting accepted in either direction.
pub const MAX_NESTING_DEPTH: usize = 128;
