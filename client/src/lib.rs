//! # Quizduel Client
//! One peer of a two-player quiz duel: agrees on round boundaries with the
//! other peer over a message bus, collects both answers, has the leader
//! grade them, and mirrors both players' health until the match ends.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod collaborators;
mod config;
mod error;
mod health;
mod match_events;
mod peer;
mod quiz;
mod round;
mod services;
mod session;

pub mod transport;

pub use collaborators::{MatchOutcome, QuizUi, SceneDirector, SceneRequest};
pub use config::{ConfigError, PipelineOptions, QuizConfig};
pub use error::QuizError;
pub use health::{
    damage_synchronizer::{DamageOrigin, DamageSynchronizer},
    health_tracker::{HealthTracker, FULL_HEALTH},
};
pub use match_events::{
    ErrorEvent, MatchEvent, MatchEvents, MatchOverEvent, RoundGradedEvent, RoundStartedEvent,
};
pub use peer::{AnswerHandle, QuizPeer};
pub use quiz::question_set::QuestionSet;
pub use round::{
    coordinator::{BusHandles, Collaborators, RoundCoordinator},
    phase::{MatchEnd, RoundPhase},
    ready_barrier::ReadyBarrier,
    round_state::RoundState,
};
pub use services::{
    GradingError, GradingFuture, GradingService, HttpGradingClient, PipelineClient, UploadError,
};
pub use session::SessionContext;

pub mod shared {
    pub use quizduel_shared::{
        BusEvent, BusMessage, EventCode, GradeRequest, GradeResponse, PeerRole, PipelineResponse,
        PlayerGrade, PlayerId, RoundIndex,
    };
}
