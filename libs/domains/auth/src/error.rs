use axum::{
    http::{StatusCode, header::InvalidHeaderValue},
    response::{IntoResponse, Response},
};
use axum_helpers::{ErrorCode, ErrorResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User already exists")]
    UserExists,

    #[error("Invalid refresh token provided")]
    MissingRefreshToken,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("{0}")]
    Store(String),

    #[error("{0}")]
    Session(String),

    #[error("{0}")]
    Token(String),

    #[error("{0}")]
    PasswordHash(String),

    #[error("Failed to create cookie: {0}")]
    Cookie(#[from] InvalidHeaderValue),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Client-facing status for the non-internal variants.
    fn rejection_status(&self) -> Option<StatusCode> {
        match self {
            AuthError::UserExists => Some(StatusCode::BAD_REQUEST),
            AuthError::MissingRefreshToken | AuthError::InvalidRefreshToken => {
                Some(StatusCode::UNAUTHORIZED)
            }
            AuthError::RefreshTokenExpired => Some(StatusCode::FORBIDDEN),
            _ => None,
        }
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            AuthError::UserExists => ErrorCode::Conflict,
            AuthError::MissingRefreshToken | AuthError::InvalidRefreshToken => {
                ErrorCode::Unauthorized
            }
            AuthError::RefreshTokenExpired => ErrorCode::Forbidden,
            AuthError::Store(_) => ErrorCode::StoreError,
            AuthError::Session(_) => ErrorCode::CacheError,
            AuthError::Token(_) => ErrorCode::TokenError,
            AuthError::PasswordHash(_) | AuthError::Cookie(_) => ErrorCode::InternalError,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.rejection_status().is_none()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        let status = match self.rejection_status() {
            Some(status) => {
                tracing::info!(error_code = code.code(), "Auth request rejected: {}", self);
                status
            }
            None => {
                tracing::error!(error_code = code.code(), "Auth request failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        ErrorResponse::new(self.to_string()).into_response_with(status)
    }
}

impl From<mongodb::error::Error> for AuthError {
    fn from(err: mongodb::error::Error) -> Self {
        AuthError::Store(err.to_string())
    }
}

impl From<redis::RedisError> for AuthError {
    fn from(err: redis::RedisError) -> Self {
        AuthError::Session(err.to_string())
    }
}

/// Logout failures answer `{"message":"Server error:","error":<message>}`.
#[derive(Debug)]
pub struct LogoutFailure(pub AuthError);

impl From<AuthError> for LogoutFailure {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl IntoResponse for LogoutFailure {
    fn into_response(self) -> Response {
        tracing::error!(
            error_code = self.0.error_code().code(),
            "Logout failed: {}",
            self.0
        );
        ErrorResponse::new("Server error:")
            .with_error(self.0.to_string())
            .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Refresh failures keep their 401/403 bodies; anything internal is masked.
#[derive(Debug)]
pub struct RefreshFailure(pub AuthError);

pub const REFRESH_INTERNAL_MESSAGE: &str = "Something went wrong";

impl From<AuthError> for RefreshFailure {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl IntoResponse for RefreshFailure {
    fn into_response(self) -> Response {
        if !self.0.is_internal() {
            return self.0.into_response();
        }

        tracing::error!(
            error_code = self.0.error_code().code(),
            "Token refresh failed: {}",
            self.0
        );
        ErrorResponse::new(REFRESH_INTERNAL_MESSAGE)
            .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    async fn parts(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_user_exists_is_bad_request() {
        let (status, body) = parts(AuthError::UserExists.into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "User already exists"}));
    }

    #[tokio::test]
    async fn test_store_error_echoes_raw_message() {
        let (status, body) =
            parts(AuthError::Store("connection refused".into()).into_response()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"message": "connection refused"}));
    }

    #[tokio::test]
    async fn test_cookie_failure_is_internal_not_token_error() {
        let err = AuthError::from(HeaderValue::from_str("bad\nvalue").unwrap_err());
        assert!(err.is_internal());
        assert_eq!(err.error_code(), ErrorCode::InternalError);

        let (status, body) = parts(err.into_response()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("Failed to create cookie: ")
        );
    }

    #[tokio::test]
    async fn test_refresh_statuses() {
        let (status, body) = parts(AuthError::MissingRefreshToken.into_response()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid refresh token provided");

        let (status, body) = parts(AuthError::RefreshTokenExpired.into_response()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Refresh token expired");
    }

    #[tokio::test]
    async fn test_logout_failure_shape() {
        let failure = LogoutFailure::from(AuthError::Session("broken pipe".into()));
        let (status, body) = parts(failure.into_response()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"message": "Server error:", "error": "broken pipe"}));
    }

    #[tokio::test]
    async fn test_refresh_failure_masks_internal_errors() {
        let failure = RefreshFailure::from(AuthError::Session("broken pipe".into()));
        let (status, body) = parts(failure.into_response()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"message": "Something went wrong"}));
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_rejections() {
        let failure = RefreshFailure::from(AuthError::InvalidRefreshToken);
        let (status, body) = parts(failure.into_response()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"message": "Invalid refresh token"}));
    }
}
