use crate::{
    protocol::EventCode,
    types::{PlayerId, RoundIndex},
};

/// Payload of one custom bus event.
///
/// Identities inside payloads stay as strings until the receiver resolves
/// them, so a peer running a newer roster (or a corrupted one) surfaces as
/// an unknown identity rather than a decode failure.
#[derive(Clone, Debug, PartialEq)]
pub enum BusEvent {
    /// `ANSWER (code 1)`: `player` answered `text` in `round`
    Answer {
        round: RoundIndex,
        player: String,
        text: String,
    },
    /// `DAMAGE (code 5)`: reduce `target`'s health by `amount`
    Damage {
        round: RoundIndex,
        target: String,
        amount: f32,
    },
    /// `ROUND_START (code 99)`: every peer begins `round`
    RoundStart { round: RoundIndex },
}

impl BusEvent {
    pub fn code(&self) -> EventCode {
        match self {
            BusEvent::Answer { .. } => EventCode::Answer,
            BusEvent::Damage { .. } => EventCode::Damage,
            BusEvent::RoundStart { .. } => EventCode::RoundStart,
        }
    }

    pub fn round(&self) -> RoundIndex {
        match self {
            BusEvent::Answer { round, .. }
            | BusEvent::Damage { round, .. }
            | BusEvent::RoundStart { round } => *round,
        }
    }
}

/// A bus event tagged with the player that published it
#[derive(Clone, Debug, PartialEq)]
pub struct BusMessage {
    pub origin: PlayerId,
    pub event: BusEvent,
}

impl BusMessage {
    pub fn new(origin: PlayerId, event: BusEvent) -> Self {
        Self { origin, event }
    }

    pub fn answer(origin: PlayerId, round: RoundIndex, text: impl Into<String>) -> Self {
        Self::new(
            origin,
            BusEvent::Answer {
                round,
                player: origin.name().to_string(),
                text: text.into(),
            },
        )
    }

    pub fn damage(
        origin: PlayerId,
        round: RoundIndex,
        target: impl Into<String>,
        amount: f32,
    ) -> Self {
        Self::new(
            origin,
            BusEvent::Damage {
                round,
                target: target.into(),
                amount,
            },
        )
    }

    pub fn round_start(origin: PlayerId, round: RoundIndex) -> Self {
        Self::new(origin, BusEvent::RoundStart { round })
    }

    pub fn code(&self) -> EventCode {
        self.event.code()
    }
}
