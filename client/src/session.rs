use quizduel_shared::PlayerId;

use crate::{
    health::damage_synchronizer::DamageSynchronizer, quiz::question_set::QuestionSet,
    transport::EventSender,
};

/// State that lives exactly as long as one match session: the quiz being
/// played and both players' mirrored health. Handed to the coordinator at
/// construction.
pub struct SessionContext {
    local: PlayerId,
    questions: QuestionSet,
    health: DamageSynchronizer,
}

impl SessionContext {
    pub fn new(local: PlayerId, questions: QuestionSet, sender: Box<dyn EventSender>) -> Self {
        Self {
            local,
            questions,
            health: DamageSynchronizer::new(local, sender),
        }
    }

    pub fn local_player(&self) -> PlayerId {
        self.local
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn questions_mut(&mut self) -> &mut QuestionSet {
        &mut self.questions
    }

    pub fn health(&self) -> &DamageSynchronizer {
        &self.health
    }

    pub fn health_mut(&mut self) -> &mut DamageSynchronizer {
        &mut self.health
    }
}
