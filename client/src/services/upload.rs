use std::path::Path;

use log::{debug, info};
use reqwest::{
    header::ACCEPT,
    multipart::{Form, Part},
    Client,
};
use thiserror::Error;

use quizduel_shared::PipelineResponse;

use crate::config::{PipelineOptions, QuizConfig};

const PDF_MIME: &str = "application/pdf";
const PPTX_MIME: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Errors that can occur while uploading a document to the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// Only slide decks and PDFs are accepted
    #[error("Unsupported file '{path}'. Only .pdf or .pptx documents are accepted")]
    UnsupportedFile { path: String },

    /// The document could not be read from disk
    #[error("Failed to read '{path}': {reason}")]
    Read { path: String, reason: String },

    /// The HTTP client could not be constructed
    #[error("Failed to build pipeline client: {reason}")]
    ClientBuild { reason: String },

    /// The request never produced a response
    #[error("Pipeline upload failed: {reason}")]
    Transport { reason: String },

    /// The pipeline answered with a non-success status
    #[error("Pipeline returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not a valid pipeline response
    #[error("Failed to parse pipeline response: {reason}")]
    Parse { reason: String },
}

/// MIME type for an uploadable document, judged by extension
pub fn mime_for(path: &Path) -> Result<&'static str, UploadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("pdf") => Ok(PDF_MIME),
        Some("pptx") => Ok(PPTX_MIME),
        _ => Err(UploadError::UnsupportedFile {
            path: path.display().to_string(),
        }),
    }
}

/// Sends a document through extraction, summarization and question
/// generation, returning the quiz material
pub struct PipelineClient {
    url: String,
    options: PipelineOptions,
    client: Client,
}

impl PipelineClient {
    pub fn new(config: &QuizConfig) -> Result<Self, UploadError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| UploadError::ClientBuild {
                reason: err.to_string(),
            })?;

        Ok(Self {
            url: config.pipeline_url.clone(),
            options: config.pipeline.clone(),
            client,
        })
    }

    pub async fn upload(&self, path: &Path) -> Result<PipelineResponse, UploadError> {
        let mime = mime_for(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let data = tokio::fs::read(path).await.map_err(|err| UploadError::Read {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        info!("Uploading {} ({} bytes)", file_name, data.len());

        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|err| UploadError::Transport {
                reason: err.to_string(),
            })?;
        let mut form = Form::new().part("file", part).text(
            "return_cleaned",
            if self.options.return_cleaned {
                "true"
            } else {
                "false"
            },
        );
        if let Some(n_hint) = self.options.n_hint.filter(|hint| *hint > 0) {
            form = form.text("n_hint", n_hint.to_string());
        }

        let response = self
            .client
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|err| UploadError::Transport {
                reason: err.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| UploadError::Transport {
            reason: err.to_string(),
        })?;
        debug!("Server response: {}", body);

        if !status.is_success() {
            return Err(UploadError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = PipelineResponse::from_json(&body).map_err(|err| UploadError::Parse {
            reason: err.to_string(),
        })?;
        info!("Received {} questions from the pipeline", parsed.count);
        Ok(parsed)
    }
}
