use std::fmt;

/// A value exchanged with the host.
///
/// Terms are plain immutable data; build a new one rather than patching an
/// existing value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Symbolic name, compared by exact value.
    Atom(String),
    /// Ordered fixed-arity sequence.
    Tuple(Vec<Term>),
    /// Raw byte string.
    Str(Vec<u8>),
}

impl Term {
    pub fn atom(name: impl Into<String>) -> Self {
        Term::Atom(name.into())
    }

    pub fn tuple(elements: impl IntoIterator<Item = Term>) -> Self {
        Term::Tuple(elements.into_iter().collect())
    }

    pub fn str(bytes: impl Into<Vec<u8>>) -> Self {
        Term::Str(bytes.into())
    }

    /// The atom name, if this is an atom.
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Term::Atom(name) => Some(name),
            _ => None,
        }
    }

    /// The elements, if this is a tuple.
    pub fn as_tuple(&self) -> Option<&[Term]> {
        match self {
            Term::Tuple(elements) => Some(elements),
            _ => None,
        }
    }

    /// The bytes, if this is a string.
    pub fn as_str_bytes(&self) -> Option<&[u8]> {
        match self {
            Term::Str(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Host notation: `{ok,done}`, `'Quoted atom'`, `"text"`.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(name) if is_bare_atom(name) => f.write_str(name),
            Term::Atom(name) => write!(f, "'{}'", name.escape_default()),
            Term::Tuple(elements) => {
                f.write_str("{")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("}")
            }
            Term::Str(bytes) => write!(f, "\"{}\"", bytes.escape_ascii()),
        }
    }
}

fn is_bare_atom(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '@')
}
