/// Errors that can occur while setting up the duplex transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// A standard handle inherited from the host is closed or invalid.
    #[error("standard {name} handle unavailable: {source}")]
    StdHandle {
        name: &'static str,
        source: std::io::Error,
    },

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
