//! Native side of a port channel.
//!
//! The host spawns this worker and talks to it over the worker's standard
//! input and output. Each request is one length-prefixed packet holding a
//! term in the host's external format; each reply is another such packet.
//! Protocol violations end the process with a stable exit status the host
//! supervisor can act on.
//!
//! # Crate Structure
//!
//! - [`transport`]: Duplex byte stream over the inherited standard handles
//! - [`frame`]: Length-prefixed packet framing
//! - [`term`]: Atoms, tuples and strings in external term format
//! - [`handler`], [`worker`], [`exit`], [`startup`]: The request loop and
//!   its failure policy

pub mod exit;
pub mod handler;
pub mod startup;
pub mod worker;

/// Re-export transport types.
pub mod transport {
    pub use portwire_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use portwire_frame::*;
}

/// Re-export term types.
pub mod term {
    pub use portwire_term::*;
}

pub use exit::{ExitStatus, FatalError};
pub use handler::{RequestHandler, StubHandler};
pub use worker::{LoopOutcome, Worker};
