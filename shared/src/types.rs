use std::{fmt, str::FromStr};

use thiserror::Error;

/// Index of the question a round plays. Travels with every bus event so
/// peers can tell which round a message belongs to.
pub type RoundIndex = u16;

/// Errors that can occur while resolving a player identity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerIdError {
    /// The name does not belong to either seat
    #[error("Unknown player identity '{name}'. Expected \"PlayerA\" or \"PlayerB\"")]
    UnknownName { name: String },

    /// The wire tag does not belong to either seat
    #[error("Unknown player tag {tag}. Expected 0 (PlayerA) or 1 (PlayerB)")]
    UnknownTag { tag: u8 },
}

/// One of the two seats in a duel. A process keeps the same identity for
/// the whole session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlayerId {
    A,
    B,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::A, PlayerId::B];

    pub fn opponent(self) -> Self {
        match self {
            PlayerId::A => PlayerId::B,
            PlayerId::B => PlayerId::A,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlayerId::A => "PlayerA",
            PlayerId::B => "PlayerB",
        }
    }

    pub fn to_tag(self) -> u8 {
        match self {
            PlayerId::A => 0,
            PlayerId::B => 1,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, PlayerIdError> {
        match tag {
            0 => Ok(PlayerId::A),
            1 => Ok(PlayerId::B),
            _ => Err(PlayerIdError::UnknownTag { tag }),
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlayerId {
    type Err = PlayerIdError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "PlayerA" => Ok(PlayerId::A),
            "PlayerB" => Ok(PlayerId::B),
            _ => Err(PlayerIdError::UnknownName {
                name: name.to_string(),
            }),
        }
    }
}

/// Whether this peer was elected leader by the session layer. Only the
/// leader may announce round starts and call the grading service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PeerRole {
    Leader,
    Follower,
}

impl PeerRole {
    pub fn is_leader(self) -> bool {
        self == PeerRole::Leader
    }
}
