use serde::{Deserialize, Serialize};

use crate::types::PlayerId;

/// Scores are percentages; dividing by this gives normalized health damage.
pub const SCORE_SCALE: f32 = 100.0;

/// Body of the grading request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradeRequest {
    pub summary: String,
    pub full_text: String,
}

/// One player's score breakdown
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerGrade {
    pub accuracy: f32,
    pub completeness: f32,
    pub clarity: f32,
    pub relevance: f32,
    pub total: f32,
    #[serde(default)]
    pub feedback: String,
}

/// Grading service response, one breakdown per seat
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeResponse {
    #[serde(rename = "A")]
    pub a: PlayerGrade,
    #[serde(rename = "B")]
    pub b: PlayerGrade,
}

impl GradeResponse {
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    pub fn grade_of(&self, player: PlayerId) -> &PlayerGrade {
        match player {
            PlayerId::A => &self.a,
            PlayerId::B => &self.b,
        }
    }

    /// Damage dealt to `player`: the opponent's total, as a health fraction.
    pub fn damage_to(&self, player: PlayerId) -> f32 {
        self.grade_of(player.opponent()).total / SCORE_SCALE
    }
}
