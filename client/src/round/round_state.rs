use std::collections::BTreeMap;

use quizduel_shared::{PlayerId, RoundIndex};

/// Answers collected during one round. Created when the round starts,
/// dropped when it ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundState {
    round: RoundIndex,
    question: String,
    answers: BTreeMap<PlayerId, String>,
    has_answered: bool,
}

impl RoundState {
    pub fn new(round: RoundIndex, question: impl Into<String>) -> Self {
        Self {
            round,
            question: question.into(),
            answers: BTreeMap::new(),
            has_answered: false,
        }
    }

    pub fn round(&self) -> RoundIndex {
        self.round
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn has_answered(&self) -> bool {
        self.has_answered
    }

    pub(crate) fn mark_answered(&mut self) {
        self.has_answered = true;
    }

    /// Last write per player wins
    pub fn record(&mut self, player: PlayerId, answer: impl Into<String>) {
        self.answers.insert(player, answer.into());
    }

    pub fn answer_of(&self, player: PlayerId) -> Option<&str> {
        self.answers.get(&player).map(String::as_str)
    }

    pub fn is_complete(&self) -> bool {
        PlayerId::ALL
            .iter()
            .all(|player| self.answers.contains_key(player))
    }

    /// Text block sent for grading: question, summary, then one
    /// `identity: answer` line per player
    pub fn transcript(&self, summary: &str) -> String {
        let mut text = format!("Question: {}\nSummary: {}\n", self.question, summary);
        for (player, answer) in &self.answers {
            text.push_str(&format!("{}: {}\n", player, answer));
        }
        text
    }
}
