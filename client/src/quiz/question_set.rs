use log::info;

use quizduel_shared::PipelineResponse;

/// The active quiz: a summary plus ordered questions and a cursor that only
/// moves forward. Each peer holds its own copy, fed by the same upload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuestionSet {
    summary: String,
    questions: Vec<String>,
    current_index: usize,
}

impl QuestionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pipeline(response: &PipelineResponse) -> Self {
        let mut set = Self::new();
        set.set_quiz(response.summary.clone(), response.question_list());
        set
    }

    /// Replaces the quiz and rewinds to the first question
    pub fn set_quiz(&mut self, summary: impl Into<String>, questions: Vec<String>) {
        self.summary = summary.into();
        self.questions = questions;
        self.current_index = 0;
        info!("Stored {} questions for gameplay", self.questions.len());
    }

    pub fn current_question(&self) -> Option<&str> {
        self.questions.get(self.current_index).map(String::as_str)
    }

    /// Advances to the next question; stays put on the last one
    pub fn move_to_next(&mut self) {
        if self.has_more() {
            self.current_index += 1;
        } else {
            info!("All questions completed!");
        }
    }

    pub fn has_more(&self) -> bool {
        self.current_index + 1 < self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
