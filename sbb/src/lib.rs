//! sbb_rs - Rust client for SBB controllers
//!
//! An SBB controller accepts newline-terminated text commands over TCP on
//! port 6000, echoes each command back and may answer with payload lines
//! around the echo. This library keeps one lazily opened connection per
//! device and serializes command batches over it.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `sbb-core`: Error type, configuration, line protocol and reply shaping
//! - `sbb-transport`: Line-oriented transport with per-operation timeouts (TCP)
//! - `sbb-client`: Connection state, transaction lock, transactor and client
//!
//! # Usage
//!
//! ```no_run
//! use sbb::client::ClientBuilder;
//!
//! # async fn example() -> sbb::SbbResult<()> {
//! let client = ClientBuilder::new().address("10.0.0.5").build()?;
//! let reply = client.call(["getVoltage", "getCurrents"]).await;
//! println!("{}", reply);
//! # Ok(())
//! # }
//! ```

// Re-export core types
pub use sbb_core::{ClientConfig, ClientSettings, Reply, SbbError, SbbResult, Verbosity};

// Re-export client API
pub mod client {
    pub use sbb_client::*;
}

// Re-export transport layer
pub mod transport {
    pub use sbb_transport::*;
}

pub use sbb_client::{ClientBuilder, SbbClient};
