use std::{future::Future, pin::Pin};

use log::debug;
use reqwest::Client;
use thiserror::Error;

use quizduel_shared::{GradeRequest, GradeResponse};

use crate::config::QuizConfig;

/// Errors that can occur during a grading round trip
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradingError {
    /// The HTTP client could not be constructed
    #[error("Failed to build grading client: {reason}")]
    ClientBuild { reason: String },

    /// The request never produced a response
    #[error("Grading request failed: {reason}")]
    Transport { reason: String },

    /// The service answered with a non-success status
    #[error("Grading service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not a valid grading result
    #[error("Failed to parse grading JSON: {reason}")]
    Parse { reason: String },
}

pub type GradingFuture = Pin<Box<dyn Future<Output = Result<GradeResponse, GradingError>>>>;

/// External service that scores both players' answers for one question
pub trait GradingService {
    fn grade(&self, request: GradeRequest) -> GradingFuture;
}

/// Grades over HTTP: `POST {summary, full_text}` as JSON
pub struct HttpGradingClient {
    url: String,
    client: Client,
}

impl HttpGradingClient {
    pub fn new(config: &QuizConfig) -> Result<Self, GradingError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| GradingError::ClientBuild {
                reason: err.to_string(),
            })?;

        Ok(Self {
            url: config.grading_url.clone(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl GradingService for HttpGradingClient {
    fn grade(&self, request: GradeRequest) -> GradingFuture {
        let client = self.client.clone();
        let url = self.url.clone();

        Box::pin(async move {
            let response = client
                .post(&url)
                .json(&request)
                .send()
                .await
                .map_err(|err| GradingError::Transport {
                    reason: err.to_string(),
                })?;

            let status = response.status();
            let body = response.text().await.map_err(|err| GradingError::Transport {
                reason: err.to_string(),
            })?;

            if !status.is_success() {
                return Err(GradingError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            debug!("Grading result: {}", body);
            GradeResponse::from_json(&body).map_err(|err| GradingError::Parse {
                reason: err.to_string(),
            })
        })
    }
}
