//! The request loop.
//!
//! The worker alternates between waiting for a request packet and replying
//! to it, one request at a time, until a fatal condition ends the channel.
//! Fatal conditions are returned, not acted on; the binary decides how to
//! exit.

use bytes::Bytes;
use portwire_frame::{FrameConfig, FramedStream};
use portwire_transport::DuplexStream;

use crate::exit::{frame_error, FatalError};
use crate::handler::{encode_error_reply, respond, RequestHandler, FALLBACK_ERROR_REPLY};

/// Result of one read-handle-write cycle.
#[derive(Debug)]
pub enum LoopOutcome {
    /// The reply was written; ready for the next request.
    Continue,
    /// The channel is unusable and the process must exit.
    Fatal(FatalError),
}

/// Serves requests from one duplex stream with one handler.
pub struct Worker<S, H> {
    framed: FramedStream<S>,
    handler: H,
    served: u64,
}

impl<S: DuplexStream, H: RequestHandler> Worker<S, H> {
    pub fn new(stream: S, config: FrameConfig, handler: H) -> Self {
        Self {
            framed: FramedStream::with_config(stream, config),
            handler,
            served: 0,
        }
    }

    /// Read one request, handle it and write the reply.
    pub fn step(&mut self) -> LoopOutcome {
        let frame = match self.framed.read_frame() {
            Ok(frame) => frame,
            Err(err) => return LoopOutcome::Fatal(frame_error("request read failed", err)),
        };
        tracing::debug!(size = frame.len(), "request received");

        let mut reply = respond(&mut self.handler, &frame.payload);
        let limit = self.framed.config().max_packet_size;
        if reply.len() as u64 > limit {
            let message = format!("reply of {} bytes exceeds packet limit {limit}", reply.len());
            tracing::warn!(error = %message, "request failed");
            reply = encode_error_reply(&message);
            if reply.len() as u64 > limit {
                reply = Bytes::from_static(FALLBACK_ERROR_REPLY);
            }
        }

        if let Err(err) = self.framed.send(&reply) {
            return LoopOutcome::Fatal(frame_error("reply write failed", err));
        }
        self.served += 1;
        tracing::debug!(size = reply.len(), served = self.served, "reply sent");
        LoopOutcome::Continue
    }

    /// Serve requests until the channel fails.
    pub fn run(&mut self) -> FatalError {
        loop {
            if let LoopOutcome::Fatal(fatal) = self.step() {
                tracing::error!(
                    status = fatal.status.code(),
                    served = self.served,
                    error = %fatal,
                    "channel closed"
                );
                return fatal;
            }
        }
    }

    /// Number of requests answered so far.
    pub fn served(&self) -> u64 {
        self.served
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &S {
        self.framed.get_ref()
    }

    /// Consume the worker and return the underlying stream.
    pub fn into_inner(self) -> S {
        self.framed.into_inner()
    }
}
