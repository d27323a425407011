use axum::{
    Json,
    extract::multipart::MultipartError,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use memories_db::InvalidPagination;
use memories_media::MediaError;
use memories_types::api::ErrorResponse;

/// Every failure a handler can report. Each maps straight to a status code
/// and a `{"detail": ...}` body; nothing is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed or unknown bearer token.
    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidArgument(String),

    /// Missing or owned by someone else; the two are not distinguished.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Another upload already holds the stored name; retrying a second later succeeds.
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Multipart(e) => e.status(),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

impl From<InvalidPagination> for ApiError {
    fn from(e: InvalidPagination) -> Self {
        ApiError::InvalidArgument(e.to_string())
    }
}

impl From<MediaError> for ApiError {
    fn from(e: MediaError) -> Self {
        if matches!(e, MediaError::NameTaken(_)) {
            ApiError::Conflict(e.to_string())
        } else if e.is_client_error() {
            ApiError::InvalidArgument(e.to_string())
        } else {
            ApiError::Internal(e.into())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            ApiError::Internal(e) => {
                error!("Internal error: {:#}", e);
                self.to_string()
            }
            ApiError::Multipart(e) => e.body_text(),
            _ => self.to_string(),
        };

        let mut response = (status, Json(ErrorResponse { detail })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(ApiError::Unauthenticated("Invalid token").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(InvalidPagination).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("Album").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(MediaError::NameTaken("20240101000000_a.jpg".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(anyhow::anyhow!("disk on fire")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_do_not_leak_their_cause() {
        let err = ApiError::from(anyhow::anyhow!("disk on fire"));
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn unauthorized_carries_challenge_header() {
        let response = ApiError::InvalidCredentials.into_response();
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }
}
