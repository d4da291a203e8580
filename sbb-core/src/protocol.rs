//! SBB wire protocol
//!
//! The controller speaks CRLF-terminated ASCII lines. Every command is echoed
//! back verbatim (once echo mode is enabled by the handshake); anything else
//! the controller sends is a payload line.
//!
//! # Command Processing
//! ```text
//! client                          controller
//!   | --- getVoltage\r\n --------->  |
//!   | <-- getVoltage\r\n ----------  |   echo
//!   | <-- 3.3\r\n -----------------  |   payload
//!   | <-- done\r\n ----------------  |   payload, ends the command
//! ```
//!
//! An echo ends a command unless the command is a sequence command (its text
//! contains [`SEQUENCE_MARKER`]); sequence commands only end on `done`.

use bytes::{BufMut, Bytes, BytesMut};

/// Line terminator for commands and responses
pub const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Commands sent once on every new connection
pub const HANDSHAKE_COMMANDS: [&str; 2] = ["configure echoCommands 1", "detatchController"];

/// Payload that ends collection for the current command
pub const DONE_SENTINEL: &str = "done";

/// Substring marking a sequence command
pub const SEQUENCE_MARKER: &str = "Seq";

/// Encode a command for the wire (command text plus [`LINE_TERMINATOR`])
///
/// The returned bytes are also what the echo must match.
pub fn frame_command(command: &str) -> Bytes {
    let mut buf = BytesMut::with_capacity(command.len() + LINE_TERMINATOR.len());
    buf.put_slice(command.as_bytes());
    buf.put_slice(LINE_TERMINATOR);
    buf.freeze()
}

/// Whether `command` is a sequence command, whose echo does not end it
pub fn is_sequence_command(command: &str) -> bool {
    command.contains(SEQUENCE_MARKER)
}

/// A classified response line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Byte-exact echo of the command just sent
    Echo,
    /// Any other line, terminator stripped
    Payload(String),
}

impl Line {
    /// Classify a raw line (terminator included) against the framed command
    /// most recently sent
    pub fn classify(raw: &[u8], sent: &[u8]) -> Self {
        if raw == sent {
            return Line::Echo;
        }
        Line::Payload(String::from_utf8_lossy(strip_terminator(raw)).into_owned())
    }

    /// Whether this line is the `done` sentinel
    pub fn is_done(&self) -> bool {
        matches!(self, Line::Payload(payload) if payload == DONE_SENTINEL)
    }
}

fn strip_terminator(raw: &[u8]) -> &[u8] {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    raw.strip_suffix(b"\r").unwrap_or(raw)
}
