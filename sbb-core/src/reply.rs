//! Shaped transaction results

use std::fmt;

/// Result of one transaction, shaped by the number of payloads collected
///
/// - no payloads: [`Reply::Ack`] (acknowledged, no data)
/// - one payload: [`Reply::Single`]
/// - two or more: [`Reply::Many`], in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ack,
    Single(String),
    Many(Vec<String>),
}

impl Reply {
    /// Shape a list of collected payloads
    pub fn from_payloads(mut payloads: Vec<String>) -> Self {
        match payloads.len() {
            0 => Reply::Ack,
            1 => Reply::Single(payloads.remove(0)),
            _ => Reply::Many(payloads),
        }
    }

    pub fn is_ack(&self) -> bool {
        matches!(self, Reply::Ack)
    }

    /// The payload of a single-payload reply
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Reply::Single(payload) => Some(payload),
            _ => None,
        }
    }

    /// Number of payloads carried
    pub fn len(&self) -> usize {
        match self {
            Reply::Ack => 0,
            Reply::Single(_) => 1,
            Reply::Many(payloads) => payloads.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.is_ack()
    }

    /// All payloads in emission order
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Reply::Ack => Vec::new(),
            Reply::Single(payload) => vec![payload],
            Reply::Many(payloads) => payloads,
        }
    }
}

impl From<Vec<String>> for Reply {
    fn from(payloads: Vec<String>) -> Self {
        Reply::from_payloads(payloads)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ack => write!(f, "true"),
            Reply::Single(payload) => write!(f, "{}", payload),
            Reply::Many(payloads) => write!(f, "({})", payloads.join(", ")),
        }
    }
}
