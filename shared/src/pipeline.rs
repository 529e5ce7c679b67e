use log::warn;
use serde::{Deserialize, Serialize};

/// Response of the upload pipeline (extract, summarize, generate questions)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineResponse {
    pub summary: String,
    /// Newline-delimited questions
    pub questions: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub cleaned: Option<String>,
}

impl PipelineResponse {
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Questions split on newlines, trimmed, blank lines dropped
    pub fn question_list(&self) -> Vec<String> {
        let questions: Vec<String> = self
            .questions
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if self.count != 0 && self.count as usize != questions.len() {
            warn!(
                "Pipeline reported {} questions but sent {}",
                self.count,
                questions.len()
            );
        }
        questions
    }
}
