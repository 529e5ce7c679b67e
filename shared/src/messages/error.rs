use thiserror::Error;

use crate::{protocol::ProtocolError, types::PlayerIdError};

/// Errors that can occur while encoding a bus message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A text field does not fit behind its u16 length prefix
    #[error("Field '{field}' is {len} bytes, exceeding the {limit} byte limit of the wire format")]
    TextTooLong {
        field: &'static str,
        len: usize,
        limit: usize,
    },
}

/// Errors that can occur while decoding a bus message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Event code is not reserved by the protocol
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Origin tag does not name a player
    #[error("Origin error: {0}")]
    Origin(#[from] PlayerIdError),

    /// Payload ended before a field could be read
    #[error("Payload truncated while reading {field}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// A string field is not valid UTF-8
    #[error("Field '{field}' is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    /// Bytes were left over after the event was fully read
    #[error("{count} unexpected trailing bytes after event payload")]
    TrailingBytes { count: usize },
}
