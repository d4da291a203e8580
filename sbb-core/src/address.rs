//! Device address validation
//!
//! SBB controllers are addressed by plain IPv4 dotted-quad strings. Anything
//! else (host names, IPv6, out-of-range octets, leading zeros) is rejected
//! before a client object can exist.

use crate::error::{SbbError, SbbResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::Ipv4Addr;

static IPV4_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let octet = "(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])";
    Regex::new(&format!(r"^{octet}\.{octet}\.{octet}\.{octet}$"))
        .expect("IPv4 pattern is a valid regex")
});

/// Validate a device address and return it as an [`Ipv4Addr`]
///
/// # Errors
/// Returns [`SbbError::InvalidAddress`] if `address` is not a dotted-quad
/// with every octet in `0..=255`.
pub fn validate_address(address: &str) -> SbbResult<Ipv4Addr> {
    if !IPV4_PATTERN.is_match(address) {
        return Err(SbbError::InvalidAddress(format!(
            "{:?} looks invalid, expected an IPv4 dotted-quad",
            address
        )));
    }

    address
        .parse()
        .map_err(|e| SbbError::InvalidAddress(format!("{:?}: {}", address, e)))
}
