use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::supabase::SupabaseError;

#[derive(Default, Serialize)]
pub struct SimpleResponse {
    pub success: bool,
    pub message: String,
}

impl SimpleResponse {
    pub fn ok<S: ToString>(message: S) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Failure of a request, rendered as `{"success": false, "error": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Anything the provider rejected. Reported verbatim with a 500.
    #[error(transparent)]
    Provider(#[from] SupabaseError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request<S: ToString>(msg: S) -> Self {
        ApiError::BadRequest(msg.to_string())
    }

    pub fn unauthorized<S: ToString>(msg: S) -> Self {
        ApiError::Unauthorized(msg.to_string())
    }

    pub fn forbidden<S: ToString>(msg: S) -> Self {
        ApiError::Forbidden(msg.to_string())
    }

    pub fn not_found<S: ToString>(msg: S) -> Self {
        ApiError::NotFound(msg.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Provider(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            success: false,
            error: self.to_string(),
        })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Body and query parse failures get the same JSON error shape as handler failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| ApiError::bad_request(err).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| ApiError::bad_request(err).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_keep_their_message_and_map_to_500() {
        let err = ApiError::from(SupabaseError::Api {
            status: 409,
            message: "duplicate key value".into(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "duplicate key value");
    }

    #[test]
    fn validation_errors_are_client_errors() {
        assert_eq!(
            ApiError::bad_request("Missing fields").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::forbidden("nope").error_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
