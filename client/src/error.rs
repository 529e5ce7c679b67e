use thiserror::Error;

use crate::{
    config::ConfigError,
    services::{GradingError, UploadError},
    transport::BusError,
};

/// Everything that can go wrong on a quiz peer. None of these end the
/// process; at worst the current round or upload does not proceed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    #[error("Grading error: {0}")]
    Grading(#[from] GradingError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),
}
