use std::fmt;

use quizduel_shared::{PlayerId, RoundIndex};

/// How a match ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    Winner(PlayerId),
    Draw,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::Winner(player) => write!(f, "{} wins!", player),
            MatchOutcome::Draw => f.write_str("Draw!"),
        }
    }
}

/// Scene changes asked of the session layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneRequest {
    /// Quiz material is loaded and the match may begin
    QuizReady,
    /// A round has started on this peer
    RoundStarted(RoundIndex),
    /// The match has been decided
    MatchOver(MatchOutcome),
    /// Go back to the waiting area, keeping the connection
    ReturnToLobby,
}

/// The screen that shows questions and collects answers. Local answers come
/// back through `RoundCoordinator::submit_answer`.
pub trait QuizUi {
    fn set_question(&mut self, text: &str);
    fn clear_input(&mut self);
}

/// The session/transport layer that owns scenes and the room connection
pub trait SceneDirector {
    fn request(&mut self, request: SceneRequest);
}
