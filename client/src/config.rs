use std::{default::Default, time::Duration};

use thiserror::Error;

/// Errors found while validating a [`QuizConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A service endpoint was left empty
    #[error("{field} must not be empty")]
    EmptyUrl { field: &'static str },

    /// A duration that drives the loop was zero
    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },
}

/// Optional flags sent along with an uploaded document
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Ask the pipeline to include the cleaned extraction text
    pub return_cleaned: bool,
    /// Hint for how many questions to generate
    pub n_hint: Option<u32>,
}

/// Contains Config properties which will be used by a quiz peer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizConfig {
    /// Endpoint of the grading service
    pub grading_url: String,
    /// Endpoint of the upload pipeline
    pub pipeline_url: String,
    /// Upper bound for one HTTP round trip
    pub request_timeout: Duration,
    /// How long the winner is shown before returning to the lobby
    pub return_to_lobby_delay: Duration,
    /// How often the peer polls the bus
    pub tick_interval: Duration,
    /// Flags forwarded to the upload pipeline
    pub pipeline: PipelineOptions,
}

impl QuizConfig {
    /// Points both service endpoints at `base`, e.g. `http://10.0.0.2:8000`
    pub fn with_service_base(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.grading_url = format!("{}/grade", base);
        self.pipeline_url = format!("{}/pipeline", base);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grading_url.trim().is_empty() {
            return Err(ConfigError::EmptyUrl {
                field: "grading_url",
            });
        }
        if self.pipeline_url.trim().is_empty() {
            return Err(ConfigError::EmptyUrl {
                field: "pipeline_url",
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroDuration {
                field: "request_timeout",
            });
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroDuration {
                field: "tick_interval",
            });
        }
        Ok(())
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            grading_url: "http://127.0.0.1:8000/grade".to_string(),
            pipeline_url: "http://127.0.0.1:8000/pipeline".to_string(),
            request_timeout: Duration::from_secs(30),
            return_to_lobby_delay: Duration::from_secs(5),
            tick_interval: Duration::from_millis(16),
            pipeline: PipelineOptions::default(),
        }
    }
}
