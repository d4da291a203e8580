//! SBB controller client implementation
//!
//! This crate keeps one lazily opened TCP connection to a controller and runs
//! command batches over it one at a time.
//!
//! # Invocation
//!
//! Each [`SbbClient::call`] runs in two phases, each under its own
//! acquisition of the transaction lock:
//!
//! 1. `connect_and_handshake`: if disconnected, connect and send the
//!    handshake commands through the same transactor as user commands.
//! 2. `run_transaction`: send the caller's commands, collect payloads and
//!    shape them into a [`Reply`](sbb_core::Reply).
//!
//! Any transport fault (timeout, closed stream) marks the connection
//! disconnected; the next call starts over with a fresh handshake. Callers
//! always get a reply back, never an error.
//!
//! ```rust,no_run
//! use sbb_client::SbbClient;
//!
//! # async fn example() -> sbb_core::SbbResult<()> {
//! let client = SbbClient::new("10.0.0.5")?;
//! let voltage = client.call(["getVoltage"]).await;
//! println!("{}", voltage);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod client;
pub mod connection;
pub mod lock;
pub mod log_sink;
pub mod transactor;

#[cfg(test)]
mod device;

pub use builder::ClientBuilder;
pub use client::SbbClient;
pub use connection::{Connection, ConnectionState};
pub use lock::{TransactionGuard, TransactionLock};
pub use log_sink::{LevelSink, LogSink};
pub use transactor::{TransactionOutcome, Transactor};
