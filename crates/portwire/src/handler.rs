//! Request handling.
//!
//! A handler turns one request payload into one response term. Handlers may
//! fail; [`respond`] converts every failure into an `{error, "<message>"}`
//! reply so the channel keeps running.

use bytes::Bytes;
use portwire_term::{encode_term, DecodeError, Term};

/// Encoded `{error, []}`, sent when an error reply cannot be encoded or does
/// not fit the channel's packet limit.
pub const FALLBACK_ERROR_REPLY: &[u8] =
    &[131, 104, 2, 119, 5, b'e', b'r', b'r', b'o', b'r', 106];

/// A failure while producing a response for a well-framed request.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The request payload is not a valid term.
    #[error("malformed request: {0}")]
    Decode(#[from] DecodeError),

    /// The handler rejected the request.
    #[error("{0}")]
    Failed(String),
}

/// Produces a response term for each request payload.
pub trait RequestHandler {
    fn handle(&mut self, request: &[u8]) -> Result<Term, HandlerError>;
}

impl<F> RequestHandler for F
where
    F: FnMut(&[u8]) -> Result<Term, HandlerError>,
{
    fn handle(&mut self, request: &[u8]) -> Result<Term, HandlerError> {
        self(request)
    }
}

/// Acknowledges every request with `{ok, done}` without inspecting it.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubHandler;

impl RequestHandler for StubHandler {
    fn handle(&mut self, _request: &[u8]) -> Result<Term, HandlerError> {
        Ok(ok_reply())
    }
}

/// `{ok, done}`
pub fn ok_reply() -> Term {
    Term::tuple([Term::atom("ok"), Term::atom("done")])
}

/// `{error, "<message>"}`, built as a new term from the message alone.
pub fn error_reply(message: &str) -> Term {
    Term::tuple([Term::atom("error"), Term::str(message)])
}

/// Run the handler and encode its reply. Never fails.
pub fn respond<H: RequestHandler + ?Sized>(handler: &mut H, request: &[u8]) -> Bytes {
    let reply = handler
        .handle(request)
        .map_err(|err| err.to_string())
        .and_then(|term| encode_term(&term).map_err(|err| format!("unencodable reply: {err}")));

    match reply {
        Ok(bytes) => bytes,
        Err(message) => {
            tracing::warn!(error = %message, "request failed");
            encode_error_reply(&message)
        }
    }
}

/// Encode `{error, "<message>"}`.
pub fn encode_error_reply(message: &str) -> Bytes {
    encode_term(&error_reply(message)).unwrap_or_else(|_| Bytes::from_static(FALLBACK_ERROR_REPLY))
}
