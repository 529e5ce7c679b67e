use std::vec::IntoIter;

use quizduel_shared::{GradeResponse, RoundIndex};

use crate::{collaborators::MatchOutcome, error::QuizError};

pub struct MatchEvents {
    rounds_started: Vec<RoundIndex>,
    graded: Vec<(RoundIndex, GradeResponse)>,
    outcomes: Vec<MatchOutcome>,
    errors: Vec<QuizError>,
}

impl Default for MatchEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchEvents {
    pub(crate) fn new() -> Self {
        Self {
            rounds_started: Vec::new(),
            graded: Vec::new(),
            outcomes: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// True when no event of any kind is waiting to be read
    pub fn is_empty(&self) -> bool {
        self.rounds_started.is_empty()
            && self.graded.is_empty()
            && self.outcomes.is_empty()
            && self.errors.is_empty()
    }

    pub fn read<V: MatchEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: MatchEvent>(&self) -> bool {
        V::has(self)
    }

    pub(crate) fn push_round_started(&mut self, round: RoundIndex) {
        self.rounds_started.push(round);
    }

    pub(crate) fn push_graded(&mut self, round: RoundIndex, response: GradeResponse) {
        self.graded.push((round, response));
    }

    pub(crate) fn push_outcome(&mut self, outcome: MatchOutcome) {
        self.outcomes.push(outcome);
    }

    pub(crate) fn push_error(&mut self, error: QuizError) {
        self.errors.push(error);
    }
}

// Event Trait
pub trait MatchEvent {
    type Iter;

    fn iter(events: &mut MatchEvents) -> Self::Iter;

    fn has(events: &MatchEvents) -> bool;
}

// Round Started Event
pub struct RoundStartedEvent;
impl MatchEvent for RoundStartedEvent {
    type Iter = IntoIter<RoundIndex>;

    fn iter(events: &mut MatchEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.rounds_started);
        IntoIterator::into_iter(list)
    }

    fn has(events: &MatchEvents) -> bool {
        !events.rounds_started.is_empty()
    }
}

// Round Graded Event, carries both players' feedback
pub struct RoundGradedEvent;
impl MatchEvent for RoundGradedEvent {
    type Iter = IntoIter<(RoundIndex, GradeResponse)>;

    fn iter(events: &mut MatchEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.graded);
        IntoIterator::into_iter(list)
    }

    fn has(events: &MatchEvents) -> bool {
        !events.graded.is_empty()
    }
}

// Match Over Event
pub struct MatchOverEvent;
impl MatchEvent for MatchOverEvent {
    type Iter = IntoIter<MatchOutcome>;

    fn iter(events: &mut MatchEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.outcomes);
        IntoIterator::into_iter(list)
    }

    fn has(events: &MatchEvents) -> bool {
        !events.outcomes.is_empty()
    }
}

// Error Event
pub struct ErrorEvent;
impl MatchEvent for ErrorEvent {
    type Iter = IntoIter<QuizError>;

    fn iter(events: &mut MatchEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.errors);
        IntoIterator::into_iter(list)
    }

    fn has(events: &MatchEvents) -> bool {
        !events.errors.is_empty()
    }
}
