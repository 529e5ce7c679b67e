use thiserror::Error;

use quizduel_shared::{DecodeError, EncodeError, PlayerId};

/// Errors that can occur while talking to the message bus
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    /// Outgoing message could not be serialized
    #[error("Failed to encode bus message: {0}")]
    Encode(#[from] EncodeError),

    /// Incoming payload could not be parsed
    #[error("Failed to decode bus message: {0}")]
    Decode(#[from] DecodeError),

    /// The local endpoint is no longer registered on the bus
    #[error("{player} is not joined to the bus. Call join() before sending or receiving")]
    NotJoined { player: PlayerId },

    /// Shared bus state was poisoned by a panicking peer
    #[error("Bus state is poisoned; a peer panicked while holding it")]
    Poisoned,

    /// The readiness board was dropped while a peer was waiting on it
    #[error("Readiness board closed before every player was ready")]
    BoardClosed,
}
