//! Transport layer module for the SBB controller protocol
//!
//! This crate provides CRLF line streams over any async byte stream, the
//! per-operation timeout guard, and the TCP transport used to reach a
//! controller.

pub mod line;
pub mod stream;
pub mod tcp;
pub mod timeout;

pub use line::LineStream;
pub use sbb_core::{SbbError, SbbResult};
pub use stream::{LineAccessor, TransportLayer};
pub use tcp::{TcpSettings, TcpTransport};
pub use timeout::guarded;
