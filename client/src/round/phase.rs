use tokio::time::Instant;

use crate::collaborators::MatchOutcome;

/// Why a match ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchEnd {
    /// A player's health reached zero
    Knockout,
    /// Questions ran out with both players alive; decided on remaining health
    QuizComplete,
}

/// Where the coordinator is in the round cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    /// Constructed, `activate()` not yet called
    Inactive,
    /// Ready flag raised, waiting for the leader's ROUND_START
    WaitingForReady,
    /// Question shown, collecting both answers
    AwaitingAnswers,
    /// Both answers in, waiting for the round's damage
    Grading,
    /// Match decided; returns to the lobby once `return_at` passes.
    /// `return_at` is fixed on the first `update()` after the decision.
    MatchOver {
        outcome: MatchOutcome,
        end: MatchEnd,
        return_at: Option<Instant>,
    },
    /// Returned to the lobby; nothing more happens
    Terminal,
}

impl RoundPhase {
    pub fn is_match_over(&self) -> bool {
        matches!(self, RoundPhase::MatchOver { .. } | RoundPhase::Terminal)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RoundPhase::Terminal)
    }
}
