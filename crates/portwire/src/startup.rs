//! One-time startup precondition, run before the request loop.

use portwire_frame::FrameConfig;
use portwire_transport::StdioStream;

use crate::exit::{frame_error, transport_error, ExitStatus, FatalError, WorkerResult};
use crate::handler::FALLBACK_ERROR_REPLY;

/// Smallest packet limit that still fits the fallback error reply.
pub const MIN_PACKET_LIMIT: u64 = FALLBACK_ERROR_REPLY.len() as u64;

/// Validate the channel configuration and attach to the inherited standard
/// handles. Every failure here exits with the startup status.
pub fn init(config: &FrameConfig) -> WorkerResult<StdioStream> {
    check_config(config)?;
    let stream = StdioStream::open().map_err(|err| transport_error("stdio unavailable", err))?;
    tracing::info!(
        header_width = config.header_width.bytes(),
        max_packet_size = config.max_packet_size,
        "worker started"
    );
    Ok(stream)
}

fn check_config(config: &FrameConfig) -> WorkerResult<()> {
    config
        .validate()
        .map_err(|err| frame_error("invalid channel configuration", err))?;
    if config.max_packet_size < MIN_PACKET_LIMIT {
        return Err(FatalError::new(
            ExitStatus::LibraryInit,
            format!(
                "invalid channel configuration: max packet size {} is below the minimum {}",
                config.max_packet_size, MIN_PACKET_LIMIT
            ),
        ));
    }
    Ok(())
}
