use thiserror::Error;

/// Failures a single pipeline request can end with.
///
/// Missing optional fields in provider records are not represented here:
/// they are defaulted and logged by the result shaper.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    Input(String),

    #[error("Empty response from vision model")]
    EmptyResponse,

    #[error("Could not parse ingredient list from vision model response: {0}")]
    Parse(String),

    #[error("Vision model request failed: {0}")]
    UpstreamModel(String),

    #[error("No ingredients left to search for")]
    InvalidQuery,

    #[error("Recipe provider request failed: {0}")]
    UpstreamProvider(String),
}

impl PipelineError {
    /// HTTP status code this error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::Input(_) => 400,
            PipelineError::InvalidQuery => 422,
            PipelineError::EmptyResponse
            | PipelineError::Parse(_)
            | PipelineError::UpstreamModel(_)
            | PipelineError::UpstreamProvider(_) => 500,
        }
    }
}
