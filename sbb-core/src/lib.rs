//! Core types and utilities for the SBB controller protocol
//!
//! This crate provides the error type, address validation, validated client
//! configuration, wire protocol constants and result shaping used by the
//! transport and client crates.

pub mod address;
pub mod config;
pub mod error;
pub mod protocol;
pub mod reply;

pub use address::validate_address;
pub use config::{ClientConfig, ClientSettings, Verbosity};
pub use error::{SbbError, SbbResult};
pub use protocol::{Line, HANDSHAKE_COMMANDS};
pub use reply::Reply;
