use std::collections::BTreeMap;

use log::{debug, error, info, warn};
use tokio::time::Instant;

use quizduel_shared::{
    BusEvent, BusMessage, GradeRequest, GradeResponse, PeerRole, PlayerId, RoundIndex,
};

use crate::{
    collaborators::{MatchOutcome, QuizUi, SceneDirector, SceneRequest},
    config::QuizConfig,
    error::QuizError,
    match_events::MatchEvents,
    round::{
        phase::{MatchEnd, RoundPhase},
        ready_barrier::ReadyBarrier,
        round_state::RoundState,
    },
    services::GradingError,
    session::SessionContext,
    transport::{BusError, EventReceiver, EventSender, ReadinessBoard, Receivers},
};

/// The bus-facing handles a coordinator publishes through
pub struct BusHandles {
    pub sender: Box<dyn EventSender>,
    pub readiness: Box<dyn ReadinessBoard>,
}

/// Outside collaborators the coordinator notifies
pub struct Collaborators {
    pub ui: Box<dyn QuizUi>,
    pub director: Box<dyn SceneDirector>,
}

/// Drives one peer through the round cycle: waits for the leader's
/// ROUND_START, collects both answers, has the leader grade them, applies
/// damage and decides whether the match continues.
///
/// Every method takes `&mut self` and returns quickly; anything that has to
/// wait (the grading round trip, the ready barrier) is handed to the caller
/// through [`RoundCoordinator::take_grading_request`] and
/// [`RoundCoordinator::take_ready_barrier`].
pub struct RoundCoordinator {
    config: QuizConfig,
    role: PeerRole,
    session: SessionContext,
    sender: Box<dyn EventSender>,
    readiness: Box<dyn ReadinessBoard>,
    ui: Box<dyn QuizUi>,
    director: Box<dyn SceneDirector>,
    phase: RoundPhase,
    round: Option<RoundState>,
    barrier: Option<ReadyBarrier>,
    // answers that arrived before their round started here
    held_answers: BTreeMap<RoundIndex, BTreeMap<PlayerId, String>>,
    held_round_start: Option<RoundIndex>,
    pending_grading: Option<(RoundIndex, GradeRequest)>,
    last_announced: Option<RoundIndex>,
    events: MatchEvents,
}

impl RoundCoordinator {
    pub fn new(
        config: QuizConfig,
        role: PeerRole,
        session: SessionContext,
        bus: BusHandles,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            config,
            role,
            session,
            sender: bus.sender,
            readiness: bus.readiness,
            ui: collaborators.ui,
            director: collaborators.director,
            phase: RoundPhase::Inactive,
            round: None,
            barrier: None,
            held_answers: BTreeMap::new(),
            held_round_start: None,
            pending_grading: None,
            last_announced: None,
            events: MatchEvents::new(),
        }
    }

    // Lifecycle

    /// Stores freshly uploaded quiz material and tells the session layer the
    /// match may begin
    pub fn load_quiz(&mut self, summary: impl Into<String>, questions: Vec<String>) {
        self.session.questions_mut().set_quiz(summary, questions);
        self.director.request(SceneRequest::QuizReady);
    }

    /// Enters the match: full health, Ready flag raised, and on the leader a
    /// freshly armed ready barrier.
    pub fn activate(&mut self) {
        self.session.health_mut().reset();
        self.round = None;
        self.held_answers.clear();
        self.held_round_start = None;
        self.pending_grading = None;
        self.last_announced = None;
        self.phase = RoundPhase::WaitingForReady;

        if let Err(err) = self.readiness.set_ready(true) {
            error!("Failed to raise Ready flag: {}", err);
            self.events.push_error(err.into());
        }

        if self.role.is_leader() {
            self.barrier = Some(ReadyBarrier::new(
                self.readiness.subscribe(),
                PlayerId::ALL.to_vec(),
            ));
            debug!("Leader armed ready barrier");
        } else {
            self.barrier = None;
        }

        info!(
            "{} activated as {:?}, waiting for ready",
            self.local_player(),
            self.role
        );
    }

    // Ready barrier

    /// Hands the armed barrier to a caller that wants to await it instead of
    /// polling. Only the leader ever has one.
    pub fn take_ready_barrier(&mut self) -> Option<ReadyBarrier> {
        self.barrier.take()
    }

    /// Per-tick barrier check. Returns true on the tick the barrier opens.
    pub fn poll_ready_barrier(&mut self) -> bool {
        let Some(barrier) = self.barrier.as_mut() else {
            return false;
        };
        if !barrier.poll() {
            return false;
        }
        self.barrier = None;
        self.on_all_ready();
        true
    }

    /// Every player is ready. The leader starts the current round.
    pub fn on_all_ready(&mut self) {
        if !self.role.is_leader() {
            debug!("Follower ignores all-ready; only the leader starts rounds");
            return;
        }
        info!("All players ready");
        self.announce_round();
    }

    /// Leader publishes ROUND_START for the current question, at most once
    /// per round
    pub fn announce_round(&mut self) {
        if !self.role.is_leader() || self.phase.is_match_over() {
            return;
        }

        let round = self.current_round();
        if self.last_announced == Some(round) {
            debug!("Round {} already announced", round);
            return;
        }

        let message = BusMessage::round_start(self.local_player(), round);
        match self.sender.send(&message, Receivers::All) {
            Ok(()) => {
                self.last_announced = Some(round);
                info!("Leader announced round {}", round);
            }
            Err(err) => {
                error!("Failed to announce round {}: {}", round, err);
                self.events.push_error(err.into());
            }
        }
    }

    // Bus intake

    /// Drains every message waiting on `receiver`
    pub fn receive_all(&mut self, receiver: &mut dyn EventReceiver) {
        loop {
            match receiver.receive() {
                Ok(Some(message)) => self.handle_message(message),
                Ok(None) => break,
                Err(BusError::Decode(err)) => {
                    warn!("Dropping undecodable bus message: {}", err);
                }
                Err(err) => {
                    error!("Failed to receive from bus: {}", err);
                    self.events.push_error(err.into());
                    break;
                }
            }
        }
    }

    pub fn handle_message(&mut self, message: BusMessage) {
        if self.phase.is_match_over() {
            debug!("Match over, ignoring {:?} from {}", message.code(), message.origin);
            return;
        }

        let origin = message.origin;
        match message.event {
            BusEvent::RoundStart { round } => self.on_round_start_signal(round),
            BusEvent::Answer {
                round,
                player,
                text,
            } => self.on_remote_answer(round, &player, text),
            BusEvent::Damage {
                round,
                target,
                amount,
            } => {
                if origin == self.local_player() {
                    debug!("Ignoring echo of own damage for round {}", round);
                    return;
                }
                self.session.health_mut().apply_remote(&target, amount, round);
                self.try_resolve_round();
            }
        }
    }

    fn on_round_start_signal(&mut self, round: RoundIndex) {
        let current = self.current_round();

        if round < current {
            debug!("Ignoring stale ROUND_START for round {}", round);
            return;
        }
        if round > current {
            debug!(
                "ROUND_START for round {} arrived during round {}, holding it",
                round, current
            );
            self.held_round_start = Some(self.held_round_start.map_or(round, |held| held.max(round)));
            return;
        }

        let running = matches!(
            self.phase,
            RoundPhase::AwaitingAnswers | RoundPhase::Grading
        ) && self.round.as_ref().map(RoundState::round) == Some(round);
        if running {
            debug!("Round {} already running, ignoring duplicate ROUND_START", round);
            return;
        }

        self.start_round();
    }

    // Round flow

    /// Begins the current question's round, discarding any in-progress
    /// round data
    pub fn start_round(&mut self) {
        if self.phase.is_match_over() {
            debug!("Match over, not starting a new round");
            return;
        }

        let round = self.current_round();
        let Some(question) = self.session.questions().current_question() else {
            warn!("No question loaded for round {}", round);
            return;
        };
        let question = question.to_string();

        if self.held_round_start.is_some_and(|held| held <= round) {
            self.held_round_start = None;
        }
        self.pending_grading = None;
        self.round = Some(RoundState::new(round, question.clone()));
        self.phase = RoundPhase::AwaitingAnswers;

        self.ui.set_question(&question);
        self.ui.clear_input();
        self.director.request(SceneRequest::RoundStarted(round));
        self.events.push_round_started(round);
        info!("Round {} started: {}", round, question);

        self.held_answers.retain(|held_round, _| *held_round >= round);
        if let Some(held) = self.held_answers.remove(&round) {
            if let Some(state) = self.round.as_mut() {
                for (player, answer) in held {
                    debug!("Replaying held answer from {} for round {}", player, round);
                    state.record(player, answer);
                }
            }
        }

        self.try_enter_grading();
    }

    /// Local answer from the UI. Returns whether it was accepted: one
    /// non-blank answer per round, only while answers are being collected.
    pub fn submit_answer(&mut self, text: &str) -> bool {
        if self.phase != RoundPhase::AwaitingAnswers || text.trim().is_empty() {
            return false;
        }
        let local = self.local_player();
        let round = match self.round.as_ref() {
            Some(state) if !state.has_answered() => state.round(),
            _ => return false,
        };

        // nothing is recorded unless the answer reached the bus
        let message = BusMessage::answer(local, round, text);
        if let Err(err) = self.sender.send(&message, Receivers::Others) {
            error!("Failed to publish answer for round {}: {}", round, err);
            self.events.push_error(err.into());
            return false;
        }

        if let Some(state) = self.round.as_mut() {
            state.record(local, text);
            state.mark_answered();
        }
        info!("{} answered round {}", local, round);

        self.try_enter_grading();
        true
    }

    fn on_remote_answer(&mut self, round: RoundIndex, player: &str, text: String) {
        let player = match player.parse::<PlayerId>() {
            Ok(player) => player,
            Err(err) => {
                warn!("Ignoring answer for round {}: {}", round, err);
                return;
            }
        };
        if player == self.local_player() {
            warn!("Ignoring remote answer claiming to be {}", player);
            return;
        }

        if let Some(state) = self.round.as_mut() {
            if state.round() == round {
                state.record(player, text);
                debug!("Recorded answer from {} for round {}", player, round);
                self.try_enter_grading();
                return;
            }
        }

        let current = self.current_round();
        if round > current || (round == current && self.round.is_none()) {
            debug!("Holding early answer from {} for round {}", player, round);
            self.held_answers
                .entry(round)
                .or_default()
                .insert(player, text);
        } else {
            debug!("Dropping stale answer from {} for round {}", player, round);
        }
    }

    fn try_enter_grading(&mut self) {
        if self.phase != RoundPhase::AwaitingAnswers {
            return;
        }
        let Some(state) = self.round.as_ref() else {
            return;
        };
        if !state.is_complete() {
            return;
        }

        self.phase = RoundPhase::Grading;
        let round = state.round();
        info!("Both answers in for round {}, grading", round);

        if self.role.is_leader() {
            let summary = self.session.questions().summary().to_string();
            let full_text = state.transcript(&summary);
            self.pending_grading = Some((round, GradeRequest { summary, full_text }));
        } else {
            debug!("Waiting for leader's damage for round {}", round);
        }

        self.try_resolve_round();
    }

    // Grading

    /// The grading request for the round that just entered grading, if this
    /// peer is the one that grades
    pub fn take_grading_request(&mut self) -> Option<(RoundIndex, GradeRequest)> {
        self.pending_grading.take()
    }

    /// Feeds the grading outcome for `round` back in. A failure stalls the
    /// round; there is no retry.
    pub fn on_grading_result(
        &mut self,
        round: RoundIndex,
        result: Result<GradeResponse, GradingError>,
    ) {
        let grading_this_round = self.phase == RoundPhase::Grading
            && self.round.as_ref().map(RoundState::round) == Some(round);
        if !grading_this_round {
            debug!("Ignoring grading result for round {}, not grading it", round);
            return;
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                error!("Grading failed for round {}, round stalls: {}", round, err);
                self.events.push_error(QuizError::Grading(err));
                return;
            }
        };

        for player in PlayerId::ALL {
            let amount = response.damage_to(player);
            self.session
                .health_mut()
                .apply_damage(player.name(), amount, round, true);
        }
        self.events.push_graded(round, response);

        self.try_resolve_round();
    }

    // Resolution

    fn try_resolve_round(&mut self) {
        if self.phase != RoundPhase::Grading {
            return;
        }
        let Some(round) = self.round.as_ref().map(RoundState::round) else {
            return;
        };
        if !self.session.health().has_round_damage(round) {
            return;
        }
        self.resolve_round(round);
    }

    fn resolve_round(&mut self, round: RoundIndex) {
        self.round = None;

        let health = self.session.health();
        let a_dead = health.is_dead(PlayerId::A);
        let b_dead = health.is_dead(PlayerId::B);
        info!(
            "Round {} resolved: {} {:.2}, {} {:.2}",
            round,
            PlayerId::A,
            health.health_of(PlayerId::A),
            PlayerId::B,
            health.health_of(PlayerId::B)
        );

        if a_dead || b_dead {
            let outcome = match (a_dead, b_dead) {
                (true, true) => MatchOutcome::Draw,
                (true, false) => MatchOutcome::Winner(PlayerId::B),
                _ => MatchOutcome::Winner(PlayerId::A),
            };
            self.end_match(outcome, MatchEnd::Knockout);
            return;
        }

        if !self.session.questions().has_more() {
            self.session.questions_mut().move_to_next();
            let outcome = self.outcome_by_health();
            self.end_match(outcome, MatchEnd::QuizComplete);
            return;
        }

        self.session.questions_mut().move_to_next();
        self.phase = RoundPhase::WaitingForReady;
        info!("Advancing to round {}", self.current_round());

        if self.role.is_leader() {
            self.announce_round();
        }
        if let Some(held) = self.held_round_start.take() {
            self.on_round_start_signal(held);
        }
    }

    fn outcome_by_health(&self) -> MatchOutcome {
        let a = self.health_of(PlayerId::A);
        let b = self.health_of(PlayerId::B);
        if a > b {
            MatchOutcome::Winner(PlayerId::A)
        } else if b > a {
            MatchOutcome::Winner(PlayerId::B)
        } else {
            MatchOutcome::Draw
        }
    }

    fn end_match(&mut self, outcome: MatchOutcome, end: MatchEnd) {
        self.phase = RoundPhase::MatchOver {
            outcome,
            end,
            return_at: None,
        };
        self.pending_grading = None;
        self.held_answers.clear();
        self.held_round_start = None;

        let banner = match end {
            MatchEnd::Knockout => outcome.to_string(),
            MatchEnd::QuizComplete => format!("Quiz complete! {}", outcome),
        };
        self.ui.set_question(&banner);
        self.director.request(SceneRequest::MatchOver(outcome));
        self.events.push_outcome(outcome);
        info!("Match over ({:?}): {}", end, outcome);
    }

    /// Per-tick housekeeping: polls the ready barrier and, once a match has
    /// been decided, returns to the lobby after the configured delay.
    pub fn update(&mut self, now: Instant) {
        self.poll_ready_barrier();

        let delay = self.config.return_to_lobby_delay;
        let return_due = match &mut self.phase {
            RoundPhase::MatchOver { return_at, .. } => now >= *return_at.get_or_insert(now + delay),
            _ => false,
        };
        if !return_due {
            return;
        }

        self.phase = RoundPhase::Terminal;
        if let Err(err) = self.readiness.set_ready(false) {
            warn!("Failed to lower Ready flag: {}", err);
        }
        self.director.request(SceneRequest::ReturnToLobby);
        info!("Returning to lobby");
    }

    // Accessors

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn role(&self) -> PeerRole {
        self.role
    }

    pub fn local_player(&self) -> PlayerId {
        self.session.local_player()
    }

    /// Index of the round being played, which is the current question index
    pub fn current_round(&self) -> RoundIndex {
        RoundIndex::try_from(self.session.questions().current_index()).unwrap_or(RoundIndex::MAX)
    }

    pub fn round_state(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn health_of(&self, player: PlayerId) -> f32 {
        self.session.health().health_of(player)
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    /// Takes every event recorded since the last call
    pub fn take_events(&mut self) -> MatchEvents {
        std::mem::take(&mut self.events)
    }
}
