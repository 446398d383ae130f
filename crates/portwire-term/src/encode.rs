use bytes::{BufMut, Bytes, BytesMut};

use crate::error::EncodeError;
use crate::tags::*;
use crate::term::Term;

/// Encode a term as one complete versioned message.
///
/// The same term always produces the same bytes.
pub fn encode_term(term: &Term) -> Result<Bytes, EncodeError> {
    let mut buf = BytesMut::new();
    encode_term_into(term, &mut buf)?;
    Ok(buf.freeze())
}

/// Append a versioned message to `dst`.
///
/// On error `dst` is left exactly as it was.
pub fn encode_term_into(term: &Term, dst: &mut BytesMut) -> Result<(), EncodeError> {
    let start = dst.len();
    dst.put_u8(VERSION_MAGIC);
    if let Err(err) = encode_value(term, dst, 0) {
        dst.truncate(start);
        return Err(err);
    }
    Ok(())
}

fn encode_value(term: &Term, dst: &mut BytesMut, depth: usize) -> Result<(), EncodeError> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(EncodeError::TooDeep {
            max: MAX_NESTING_DEPTH,
        });
    }
    match term {
        Term::Atom(name) => encode_atom(name, dst),
        Term::Tuple(elements) => {
            if elements.len() <= u8::MAX as usize {
                dst.put_u8(SMALL_TUPLE_EXT);
                dst.put_u8(elements.len() as u8);
            } else {
                let arity = u32::try_from(elements.len())
                    .map_err(|_| EncodeError::TupleTooLarge(elements.len()))?;
                dst.put_u8(LARGE_TUPLE_EXT);
                dst.put_u32(arity);
            }
            for element in elements {
                encode_value(element, dst, depth + 1)?;
            }
            Ok(())
        }
        Term::Str(bytes) => encode_string(bytes, dst),
    }
}

fn encode_atom(name: &str, dst: &mut BytesMut) -> Result<(), EncodeError> {
    let chars = name.chars().count();
    if chars > MAX_ATOM_CHARACTERS {
        return Err(EncodeError::AtomTooLong {
            chars,
            max: MAX_ATOM_CHARACTERS,
        });
    }

    let bytes = name.as_bytes();
    if bytes.len() <= u8::MAX as usize {
        dst.put_u8(SMALL_ATOM_UTF8_EXT);
        dst.put_u8(bytes.len() as u8);
    } else {
        // at most 4 bytes per character, well under u16::MAX
        dst.put_u8(ATOM_UTF8_EXT);
        dst.put_u16(bytes.len() as u16);
    }
    dst.put_slice(bytes);
    Ok(())
}

fn encode_string(bytes: &[u8], dst: &mut BytesMut) -> Result<(), EncodeError> {
    if bytes.is_empty() {
        dst.put_u8(NIL_EXT);
    } else if bytes.len() <= MAX_STRING_EXT_LEN {
        dst.put_u8(STRING_EXT);
        dst.put_u16(bytes.len() as u16);
        dst.put_slice(bytes);
    } else {
        let count =
            u32::try_from(bytes.len()).map_err(|_| EncodeError::StringTooLong(bytes.len()))?;
        dst.reserve(1 + 4 + 2 * bytes.len() + 1);
        dst.put_u8(LIST_EXT);
        dst.put_u32(count);
        for &byte in bytes {
            dst.put_u8(SMALL_INTEGER_EXT);
            dst.put_u8(byte);
        }
        dst.put_u8(NIL_EXT);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_done_bytes() {
        let term = Term::tuple([Term::atom("ok"), Term::atom("done")]);
        let bytes = encode_term(&term).unwrap();
        assert_eq!(
            bytes.as_ref(),
            &[131, 104, 2, 119, 2, b'o', b'k', 119, 4, b'd', b'o', b'n', b'e']
        );
    }

    #[test]
    fn encoding_is_deterministic() {
        let term = Term::tuple([Term::atom("ok"), Term::atom("done")]);
        assert_eq!(encode_term(&term).unwrap(), encode_term(&term).unwrap());
    }

    #[test]
    fn error_tuple_bytes() {
        let term = Term::tuple([Term::atom("error"), Term::str("bad input")]);
        let bytes = encode_term(&term).unwrap();
        let mut expected = vec![131, 104, 2, 119, 5];
        expected.extend_from_slice(b"error");
        expected.extend_from_slice(&[107, 0, 9]);
        expected.extend_from_slice(b"bad input");
        assert_eq!(bytes.as_ref(), expected.as_slice());
    }

    #[test]
    fn empty_string_is_nil() {
        assert_eq!(encode_term(&Term::str("")).unwrap().as_ref(), &[131, 106]);
    }

    #[test]
    fn long_string_is_byte_list() {
        let bytes = vec![7u8; MAX_STRING_EXT_LEN + 1];
        let encoded = encode_term(&Term::str(bytes.clone())).unwrap();
        assert_eq!(&encoded[..6], &[131, 108, 0, 1, 0, 0]);
        assert_eq!(&encoded[6..8], &[97, 7]);
        assert_eq!(encoded.len(), 1 + 1 + 4 + 2 * bytes.len() + 1);
        assert_eq!(encoded[encoded.len() - 1], 106);
    }

    #[test]
    fn large_tuple_header() {
        let term = Term::Tuple(vec![Term::str(""); 256]);
        let encoded = encode_term(&term).unwrap();
        assert_eq!(&encoded[..6], &[131, 105, 0, 0, 1, 0]);
    }

    #[test]
    fn multibyte_atom_uses_long_form_past_255_bytes() {
        let name: String = std::iter::repeat('é').take(200).collect();
        let encoded = encode_term(&Term::atom(name)).unwrap();
        assert_eq!(&encoded[..4], &[131, 118, 1, 144]);
    }

    #[test]
    fn atom_too_long_leaves_buffer_untouched() {
        let mut buf = BytesMut::from(&b"keep"[..]);
        let term = Term::tuple([Term::atom("ok"), Term::atom("a".repeat(256))]);
        let err = encode_term_into(&term, &mut buf).unwrap_err();
        assert_eq!(
            err,
            EncodeError::AtomTooLong {
                chars: 256,
                max: 255
            }
        );
        assert_eq!(buf.as_ref(), b"keep");
    }

    #[test]
    fn nesting_limit() {
        let mut term = Term::atom("leaf");
        for _ in 0..MAX_NESTING_DEPTH {
            term = Term::tuple([term]);
        }
        assert_eq!(
            encode_term(&term).unwrap_err(),
            EncodeError::TooDeep {
                max: MAX_NESTING_DEPTH
            }
        );
    }
}
