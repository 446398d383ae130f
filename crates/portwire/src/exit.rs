use std::fmt;

use portwire_frame::FrameError;
use portwire_transport::TransportError;

/// Process exit statuses observed by the supervising host.
///
/// The numeric values are a stable contract; never renumber them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitStatus {
    /// Normal termination. The request loop never produces it.
    Success = 0,
    /// A packet buffer could not be allocated.
    Allocation = 1,
    /// Reserved: releasing a buffer failed.
    Free = 2,
    /// Generic channel I/O failure, used for failed response writes.
    Io = 3,
    /// The length header could not be read in full.
    Header = 4,
    /// The packet body could not be read in full.
    Body = 5,
    /// The declared packet length is zero or over the limit.
    PacketSize = 6,
    /// Startup precondition failed.
    LibraryInit = 7,
}

impl ExitStatus {
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

pub type WorkerResult<T> = Result<T, FatalError>;

/// An unrecoverable condition and the status the process must exit with.
#[derive(Debug)]
pub struct FatalError {
    pub status: ExitStatus,
    pub message: String,
}

impl FatalError {
    pub fn new(status: ExitStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FatalError {}

pub fn frame_error(context: &str, err: FrameError) -> FatalError {
    let status = match err {
        FrameError::InvalidHeader { .. } => ExitStatus::Header,
        FrameError::TruncatedBody { .. } => ExitStatus::Body,
        FrameError::InvalidPacketSize { .. } => ExitStatus::PacketSize,
        FrameError::Allocation { .. } => ExitStatus::Allocation,
        FrameError::Write(_)
        | FrameError::WriteStalled { .. }
        | FrameError::OutgoingPacketSize { .. } => ExitStatus::Io,
        FrameError::UnsupportedHeaderWidth(_) | FrameError::InvalidConfig { .. } => {
            ExitStatus::LibraryInit
        }
    };
    FatalError::new(status, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> FatalError {
    FatalError::new(ExitStatus::LibraryInit, format!("{context}: {err}"))
}
