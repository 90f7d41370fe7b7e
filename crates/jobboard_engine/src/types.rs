use std::fmt;

use jobboard_core::{Generation, Job, LoadError, LoadErrorKind};

/// The two failure categories the views distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Parse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Request could not be built (bad id, unusable base url).
    InvalidRequest,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// Body was not JSON or not the expected shape.
    Parse,
    Network,
}

impl ApiErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiErrorKind::Parse => ErrorCategory::Parse,
            ApiErrorKind::InvalidRequest
            | ApiErrorKind::HttpStatus(_)
            | ApiErrorKind::Timeout
            | ApiErrorKind::TooLarge { .. }
            | ApiErrorKind::Network => ErrorCategory::Network,
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::InvalidRequest => write!(f, "invalid request"),
            ApiErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            ApiErrorKind::Parse => write!(f, "invalid response body"),
            ApiErrorKind::Network => write!(f, "network error"),
        }
    }
}

/// Failure of a job API call, returned as a value rather than raised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl From<ApiError> for LoadError {
    fn from(err: ApiError) -> Self {
        let kind = match err.category() {
            ErrorCategory::Network => LoadErrorKind::Network,
            ErrorCategory::Parse => LoadErrorKind::Parse,
        };
        LoadError::new(kind, err.to_string())
    }
}

/// Results reported by [`crate::EngineHandle`], tagged with the generation of
/// the effect that requested them.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    JobsFetched {
        generation: Generation,
        result: Result<Vec<Job>, ApiError>,
    },
    JobFetched {
        generation: Generation,
        job_id: String,
        result: Result<Job, ApiError>,
    },
}
