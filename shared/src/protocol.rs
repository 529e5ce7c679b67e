pub mod error;
pub use error::ProtocolError;

/// Custom event codes reserved on the message bus. Every code rides its own
/// reliable, ordered lane; there is no ordering between lanes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum EventCode {
    /// A player's answer for the current round
    Answer = 1,
    /// Damage to apply to one player's health
    Damage = 5,
    /// Leader's signal that a round begins
    RoundStart = 99,
}

impl EventCode {
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for EventCode {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(EventCode::Answer),
            5 => Ok(EventCode::Damage),
            99 => Ok(EventCode::RoundStart),
            _ => Err(ProtocolError::UnknownEventCode { code }),
        }
    }
}
