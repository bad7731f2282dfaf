use axum::http::StatusCode;
use thiserror::Error;

/// Failure taxonomy for the document pipeline. Each variant maps to the
/// stage at which the pipeline aborted; a degraded model decode is not an
/// error and never appears here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unsupported media type: {0}")]
    UnsupportedType(String),

    #[error("failed to store uploaded document")]
    Storage(#[source] std::io::Error),

    #[error("failed to extract text from document")]
    ExtractionFailed(#[source] anyhow::Error),

    #[error("document contains no extractable text")]
    NoExtractableText,

    #[error("model analysis failed")]
    AnalysisFailed(#[source] anyhow::Error),

    #[error("failed to save rewritten document")]
    SaveFailed(#[source] anyhow::Error),
}

impl PipelineError {
    /// Name of the pipeline stage at which this failure occurred.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::UnsupportedType(_) => "validated",
            Self::Storage(_) => "stored",
            Self::ExtractionFailed(_) | Self::NoExtractableText => "extracted",
            Self::AnalysisFailed(_) => "analyzed",
            Self::SaveFailed(_) => "materialized",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedType(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) | Self::SaveFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ExtractionFailed(_) | Self::NoExtractableText => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::AnalysisFailed(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Underlying cause, when one exists, for the error response body.
    pub fn detail(&self) -> Option<String> {
        use std::error::Error as _;
        self.source().map(|source| source.to_string())
    }
}
