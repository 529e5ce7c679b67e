mod grading;
mod upload;

pub use grading::{GradingError, GradingFuture, GradingService, HttpGradingClient};
pub use upload::{PipelineClient, UploadError};
