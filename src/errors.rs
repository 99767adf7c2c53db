use axum::http::StatusCode;
use thiserror::Error;

/// Failures while turning raw rows into buckets.
#[derive(Debug, Error)]
pub enum BucketError {
    #[error("malformed timestamp bucket {raw:?}: {source}")]
    MalformedTimestamp {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Failures talking to the backend.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{url} returned {status}")]
    Status { url: String, status: u16 },
}

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Bucket(#[from] BucketError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn bad_gateway(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: err.to_string(),
        }
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        Self::bad_gateway(err)
    }
}

impl From<AggregateError> for AppError {
    fn from(err: AggregateError) -> Self {
        Self::bad_gateway(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
