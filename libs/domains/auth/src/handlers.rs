use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{AppendHeaders, IntoResponse, Response},
    routing::post,
};
use axum_helpers::{
    ValidatedJson, clear_cookie,
    errors::responses::{
        BadRequestValidationResponse, ForbiddenResponse, InternalServerErrorResponse,
        UnauthorizedResponse,
    },
    read_cookie, session_cookie,
};
#[allow(unused_imports)]
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::config::{ACCESS_TOKEN_TTL_SECS, REFRESH_TOKEN_TTL_SECS};
use crate::error::{AuthError, AuthResult, LogoutFailure, RefreshFailure};
use crate::models::{LoginRequest, MessageResponse, Role, SignupRequest, TokenPair, UserResponse};
use crate::repository::UserRepository;
use crate::service::{AuthService, INVALID_CREDENTIALS_MESSAGE, LoginOutcome};
use crate::session::SessionStore;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// OpenAPI documentation for the auth API
#[derive(OpenApi)]
#[openapi(
    paths(signup, login, logout, refresh_token),
    components(
        schemas(SignupRequest, LoginRequest, UserResponse, MessageResponse, Role),
        responses(
            BadRequestValidationResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Auth", description = "Email/password authentication with cookie-borne JWTs")
    )
)]
pub struct ApiDoc;

/// Create the auth router with all HTTP endpoints
pub fn router<R, S>(service: AuthService<R, S>) -> Router
where
    R: UserRepository + 'static,
    S: SessionStore + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh-token", post(refresh_token))
        .with_state(shared_service)
}

fn cookie(name: &str, value: &str, max_age_secs: u64, secure: bool) -> AuthResult<HeaderValue> {
    Ok(session_cookie(name, value, max_age_secs, secure)?)
}

fn token_cookies(pair: &TokenPair, secure: bool) -> AuthResult<[(header::HeaderName, HeaderValue); 2]> {
    Ok([
        (
            header::SET_COOKIE,
            cookie(ACCESS_TOKEN_COOKIE, &pair.access_token, ACCESS_TOKEN_TTL_SECS, secure)?,
        ),
        (
            header::SET_COOKIE,
            cookie(REFRESH_TOKEN_COOKIE, &pair.refresh_token, REFRESH_TOKEN_TTL_SECS, secure)?,
        ),
    ])
}

/// Register a new user and start their session
#[utoipa::path(
    post,
    path = "/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created; accessToken and refreshToken cookies set", body = UserResponse),
        (status = 400, description = "User already exists or invalid body", body = MessageResponse,
            example = json!({"message": "User already exists"})),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn signup<R: UserRepository, S: SessionStore>(
    State(service): State<Arc<AuthService<R, S>>>,
    ValidatedJson(input): ValidatedJson<SignupRequest>,
) -> AuthResult<impl IntoResponse> {
    let (user, pair) = service.signup(input).await?;
    let cookies = token_cookies(&pair, service.config().secure_cookies)?;

    Ok((StatusCode::CREATED, AppendHeaders(cookies), Json(user)))
}

/// Authenticate with email and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; cookies set. Also returned with a message body for bad credentials unless strict login is enabled", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, description = "Bad credentials when AUTH_REJECT_INVALID_LOGIN is enabled", body = MessageResponse,
            example = json!({"message": "Invalid email or password"})),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository, S: SessionStore>(
    State(service): State<Arc<AuthService<R, S>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AuthResult<Response> {
    match service.login(input).await? {
        LoginOutcome::Authenticated(user, pair) => {
            let cookies = token_cookies(&pair, service.config().secure_cookies)?;
            Ok((StatusCode::OK, AppendHeaders(cookies), Json(user)).into_response())
        }
        LoginOutcome::InvalidCredentials => {
            let status = if service.config().reject_invalid_login {
                StatusCode::UNAUTHORIZED
            } else {
                StatusCode::OK
            };
            Ok((status, Json(MessageResponse::new(INVALID_CREDENTIALS_MESSAGE))).into_response())
        }
    }
}

/// End the current session and clear both cookies
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Cookies cleared", body = MessageResponse,
            example = json!({"message": "Logged out successfully"})),
        (status = 500, description = "Session store failure", body = axum_helpers::ErrorResponse,
            example = json!({"message": "Server error:", "error": "connection refused"}))
    )
)]
async fn logout<R: UserRepository, S: SessionStore>(
    State(service): State<Arc<AuthService<R, S>>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, LogoutFailure> {
    let refresh_token = read_cookie(&headers, REFRESH_TOKEN_COOKIE);
    service.logout(refresh_token.as_deref()).await?;

    let secure = service.config().secure_cookies;
    let clear = |name: &str| clear_cookie(name, secure).map_err(AuthError::from);
    let cookies = [
        (header::SET_COOKIE, clear(ACCESS_TOKEN_COOKIE)?),
        (header::SET_COOKIE, clear(REFRESH_TOKEN_COOKIE)?),
    ];

    Ok((
        AppendHeaders(cookies),
        Json(MessageResponse::new("Logged out successfully")),
    ))
}

/// Exchange the refresh cookie for a new access token
#[utoipa::path(
    post,
    path = "/refresh-token",
    tag = "Auth",
    responses(
        (status = 200, description = "New accessToken cookie set", body = MessageResponse,
            example = json!({"message": "Token refreshed successfully"})),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, description = "Unexpected failure", body = MessageResponse,
            example = json!({"message": "Something went wrong"}))
    )
)]
async fn refresh_token<R: UserRepository, S: SessionStore>(
    State(service): State<Arc<AuthService<R, S>>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, RefreshFailure> {
    let presented = read_cookie(&headers, REFRESH_TOKEN_COOKIE);
    let access_token = service.refresh(presented.as_deref()).await?;

    let access_cookie = cookie(
        ACCESS_TOKEN_COOKIE,
        &access_token,
        ACCESS_TOKEN_TTL_SECS,
        service.config().secure_cookies,
    )?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, access_cookie)]),
        Json(MessageResponse::new("Token refreshed successfully")),
    ))
}
