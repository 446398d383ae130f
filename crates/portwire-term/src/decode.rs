use bytes::Buf;

use crate::error::DecodeError;
use crate::tags::*;
use crate::term::Term;

/// Decode one complete versioned message.
///
/// The whole buffer must be consumed by exactly one term.
pub fn decode_term(buf: &[u8]) -> Result<Term, DecodeError> {
    let mut src = buf;
    ensure(&src, 1)?;
    let version = src.get_u8();
    if version != VERSION_MAGIC {
        return Err(DecodeError::VersionMismatch {
            found: version,
            expected: VERSION_MAGIC,
        });
    }

    let term = decode_value(&mut src, 0)?;
    if !src.is_empty() {
        return Err(DecodeError::TrailingBytes(src.len()));
    }
    Ok(term)
}

fn decode_value(src: &mut &[u8], depth: usize) -> Result<Term, DecodeError> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(DecodeError::TooDeep {
            max: MAX_NESTING_DEPTH,
        });
    }

    ensure(src, 1)?;
    match src.get_u8() {
        SMALL_ATOM_UTF8_EXT => {
            let len = take_u8_len(src)?;
            utf8_atom(take(src, len)?)
        }
        ATOM_UTF8_EXT => {
            let len = take_u16_len(src)?;
            utf8_atom(take(src, len)?)
        }
        SMALL_ATOM_EXT => {
            let len = take_u8_len(src)?;
            latin1_atom(take(src, len)?)
        }
        ATOM_EXT => {
            let len = take_u16_len(src)?;
            latin1_atom(take(src, len)?)
        }
        SMALL_TUPLE_EXT => {
            let arity = take_u8_len(src)?;
            decode_elements(src, arity, depth)
        }
        LARGE_TUPLE_EXT => {
            let arity = take_u32_len(src)?;
            decode_elements(src, arity, depth)
        }
        NIL_EXT => Ok(Term::Str(Vec::new())),
        STRING_EXT => {
            let len = take_u16_len(src)?;
            Ok(Term::Str(take(src, len)?.to_vec()))
        }
        LIST_EXT => decode_byte_list(src),
        other => Err(DecodeError::UnknownTag(other)),
    }
}

fn decode_elements(src: &mut &[u8], arity: usize, depth: usize) -> Result<Term, DecodeError> {
    // every element takes at least one byte, so a larger arity cannot fit
    ensure(src, arity)?;
    let mut elements = Vec::with_capacity(arity);
    for _ in 0..arity {
        elements.push(decode_value(src, depth + 1)?);
    }
    Ok(Term::Tuple(elements))
}

/// A proper list of small integers is the host's long-string form.
fn decode_byte_list(src: &mut &[u8]) -> Result<Term, DecodeError> {
    let count = take_u32_len(src)?;
    let needed = count
        .checked_mul(2)
        .and_then(|n| n.checked_add(1))
        .ok_or(DecodeError::Truncated {
            needed: usize::MAX,
            remaining: src.len(),
        })?;
    ensure(src, needed)?;

    let mut bytes = Vec::with_capacity(count);
    for _ in 0..count {
        if src.get_u8() != SMALL_INTEGER_EXT {
            return Err(DecodeError::UnsupportedList);
        }
        bytes.push(src.get_u8());
    }
    if src.get_u8() != NIL_EXT {
        return Err(DecodeError::UnsupportedList);
    }
    Ok(Term::Str(bytes))
}

fn utf8_atom(bytes: &[u8]) -> Result<Term, DecodeError> {
    let name = std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidAtom)?;
    check_atom_length(name.chars().count())?;
    Ok(Term::atom(name))
}

fn latin1_atom(bytes: &[u8]) -> Result<Term, DecodeError> {
    check_atom_length(bytes.len())?;
    Ok(Term::Atom(bytes.iter().map(|&b| char::from(b)).collect()))
}

fn check_atom_length(chars: usize) -> Result<(), DecodeError> {
    if chars > MAX_ATOM_CHARACTERS {
        return Err(DecodeError::AtomTooLong {
            chars,
            max: MAX_ATOM_CHARACTERS,
        });
    }
    Ok(())
}

fn ensure(src: &[u8], needed: usize) -> Result<(), DecodeError> {
    if src.len() < needed {
        return Err(DecodeError::Truncated {
            needed,
            remaining: src.len(),
        });
    }
    Ok(())
}

fn take<'a>(src: &mut &'a [u8], len: usize) -> Result<&'a [u8], DecodeError> {
    ensure(src, len)?;
    let (head, tail) = src.split_at(len);
    *src = tail;
    Ok(head)
}

fn take_u8_len(src: &mut &[u8]) -> Result<usize, DecodeError> {
    ensure(src, 1)?;
    Ok(src.get_u8() as usize)
}

fn take_u16_len(src: &mut &[u8]) -> Result<usize, DecodeError> {
    ensure(src, 2)?;
    Ok(src.get_u16() as usize)
}

fn take_u32_len(src: &mut &[u8]) -> Result<usize, DecodeError> {
    ensure(src, 4)?;
    Ok(src.get_u32() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_term;

    fn error_reply(message: &str) -> Term {
        Term::tuple([Term::atom("error"), Term::str(message)])
    }

    #[test]
    fn decodes_error_reply_exactly() {
        let encoded = encode_term(&error_reply("bad input")).unwrap();
        let decoded = decode_term(&encoded).unwrap();

        let elements = decoded.as_tuple().unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].as_atom(), Some("error"));
        assert_eq!(elements[1].as_str_bytes(), Some(&b"bad input"[..]));
    }

    #[test]
    fn inverse_of_encode_for_mixed_terms() {
        let terms = [
            Term::tuple([Term::atom("ok"), Term::atom("done")]),
            Term::tuple([Term::atom("nested"), Term::tuple([Term::str(""), Term::atom("x")])]),
            Term::str(vec![0u8, 255, 10]),
            Term::Tuple(vec![Term::atom("a"); 300]),
            Term::str(vec![42u8; 70_000]),
            Term::atom("ünïcode"),
        ];
        for term in terms {
            let encoded = encode_term(&term).unwrap();
            assert_eq!(decode_term(&encoded).unwrap(), term);
        }
    }

    #[test]
    fn latin1_atoms_decode() {
        assert_eq!(
            decode_term(&[131, 115, 2, b'o', b'k']).unwrap(),
            Term::atom("ok")
        );
        assert_eq!(
            decode_term(&[131, 100, 0, 1, 0xE9]).unwrap(),
            Term::atom("é")
        );
    }

    #[test]
    fn rejects_atoms_the_encoder_would_refuse() {
        let mut utf8 = vec![131, 118, 0x01, 0x00];
        utf8.extend(std::iter::repeat(b'a').take(256));
        assert_eq!(
            decode_term(&utf8).unwrap_err(),
            DecodeError::AtomTooLong { chars: 256, max: 255 }
        );

        let mut latin1 = vec![131, 100, 0x01, 0x2C];
        latin1.extend(std::iter::repeat(0xE9).take(300));
        assert_eq!(
            decode_term(&latin1).unwrap_err(),
            DecodeError::AtomTooLong { chars: 300, max: 255 }
        );

        // 255 two-byte characters fit the character limit
        let name = "é".repeat(255);
        let mut wide = vec![131, 118];
        wide.extend_from_slice(&(name.len() as u16).to_be_bytes());
        wide.extend_from_slice(name.as_bytes());
        assert_eq!(decode_term(&wide).unwrap(), Term::atom(name));
    }

    #[test]
    fn rejects_version_mismatch() {
        assert_eq!(
            decode_term(&[130, 106]).unwrap_err(),
            DecodeError::VersionMismatch {
                found: 130,
                expected: 131
            }
        );
    }

    #[test]
    fn rejects_empty_payload() {
        assert_eq!(
            decode_term(&[]).unwrap_err(),
            DecodeError::Truncated {
                needed: 1,
                remaining: 0
            }
        );
    }

    #[test]
    fn rejects_lengths_past_buffer() {
        assert_eq!(
            decode_term(&[131, 107, 0, 9, b'b', b'a', b'd']).unwrap_err(),
            DecodeError::Truncated {
                needed: 9,
                remaining: 3
            }
        );
        assert!(matches!(
            decode_term(&[131, 119, 5, b'o', b'k']),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn hostile_arity_is_truncated_not_allocated() {
        assert!(matches!(
            decode_term(&[131, 105, 0xFF, 0xFF, 0xFF, 0xFF, 106]),
            Err(DecodeError::Truncated { .. })
        ));
        assert!(matches!(
            decode_term(&[131, 108, 0xFF, 0xFF, 0xFF, 0xFF, 97, 1, 106]),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn rejects_unknown_tag() {
        assert_eq!(
            decode_term(&[131, 109, 0, 0, 0, 0]).unwrap_err(),
            DecodeError::UnknownTag(109)
        );
    }

    #[test]
    fn rejects_invalid_utf8_atom() {
        assert_eq!(
            decode_term(&[131, 119, 1, 0xFF]).unwrap_err(),
            DecodeError::InvalidAtom
        );
    }

    #[test]
    fn rejects_non_byte_lists() {
        assert_eq!(
            decode_term(&[131, 108, 0, 0, 0, 1, 119, 1, b'a', 106]).unwrap_err(),
            DecodeError::UnsupportedList
        );
        assert_eq!(
            decode_term(&[131, 108, 0, 0, 0, 1, 97, 1, 97]).unwrap_err(),
            DecodeError::UnsupportedList
        );
    }

    #[test]
    fn rejects_trailing_bytes() {
        assert_eq!(
            decode_term(&[131, 106, 0, 0]).unwrap_err(),
            DecodeError::TrailingBytes(2)
        );
    }

    #[test]
    fn rejects_excessive_nesting() {
        let mut payload = vec![131];
        payload.extend(std::iter::repeat([104u8, 1]).take(MAX_NESTING_DEPTH).flatten());
        payload.push(106);
        assert_eq!(
            decode_term(&payload).unwrap_err(),
            DecodeError::TooDeep {
                max: MAX_NESTING_DEPTH
            }
        );
    }
}
