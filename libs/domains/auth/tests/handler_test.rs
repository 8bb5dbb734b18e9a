//! Handler tests for the auth domain
//!
//! Requests go through the real router and extractors; users and sessions
//! live in the in-memory stores so no containers are needed.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use chrono::Utc;
use domain_auth::*;
use domain_auth::models::Claims;
use http_body_util::BodyExt;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Value, json};
use test_utils::TestDataBuilder;
use test_utils::assertions::{assert_cookie, assert_some};
use tower::ServiceExt; // For oneshot()

type Service = AuthService<InMemoryUserRepository, InMemorySessionStore>;

struct Harness {
    service: Service,
    users: InMemoryUserRepository,
    sessions: InMemorySessionStore,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(test_config())
    }

    fn with_config(config: AuthConfig) -> Self {
        let users = InMemoryUserRepository::new();
        let sessions = InMemorySessionStore::new();
        let service = AuthService::new(users.clone(), sessions.clone(), config);
        Self {
            service,
            users,
            sessions,
        }
    }

    fn app(&self) -> Router {
        router(self.service.clone())
    }

    async fn post_json(&self, uri: &str, body: Value) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.app().oneshot(request).await.unwrap()
    }

    async fn post_with_cookie(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::builder().method("POST").uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn signup(&self, builder: &TestDataBuilder) -> (Value, String) {
        let response = self
            .post_json(
                "/signup",
                json!({
                    "email": builder.email("ada"),
                    "password": builder.password(),
                    "name": "Ada",
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let refresh = cookie_value(&response, REFRESH_TOKEN_COOKIE);
        (json_body(response).await, refresh)
    }
}

const ACCESS_SECRET: &str = "access-secret-access-secret-access-secret";
const REFRESH_SECRET: &str = "refresh-secret-refresh-secret-refresh-secret";

fn test_config() -> AuthConfig {
    AuthConfig::new(ACCESS_SECRET, REFRESH_SECRET).unwrap()
}

// Helper to parse JSON response body
async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn set_cookie(response: &Response<Body>, name: &str) -> String {
    assert_some(
        set_cookies(response)
            .into_iter()
            .find(|c| c.starts_with(&format!("{}=", name))),
        name,
    )
}

fn cookie_value(response: &Response<Body>, name: &str) -> String {
    let cookie = set_cookie(response, name);
    let pair = cookie.split(';').next().unwrap();
    pair.split_once('=').unwrap().1.to_string()
}

#[tokio::test]
async fn test_signup_returns_201_with_cookies() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("signup_201");

    let response = harness
        .post_json(
            "/signup",
            json!({
                "email": builder.email("ada"),
                "password": builder.password(),
                "name": "Ada",
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let access = set_cookie(&response, ACCESS_TOKEN_COOKIE);
    let refresh = set_cookie(&response, REFRESH_TOKEN_COOKIE);
    assert_cookie(&access, ACCESS_TOKEN_COOKIE, 900);
    assert_cookie(&refresh, REFRESH_TOKEN_COOKIE, 604800);
    for cookie in [&access, &refresh] {
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/"));
        assert!(!cookie.contains("Secure"));
    }

    let refresh_token = cookie_value(&response, REFRESH_TOKEN_COOKIE);
    let body = json_body(response).await;
    assert_eq!(body["email"], builder.email("ada"));
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["role"], "customer");
    assert!(body["id"].is_string());
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());

    let user_id = body["id"].as_str().unwrap();
    let stored = harness.sessions.get(user_id).await.unwrap();
    assert_eq!(stored, Some(refresh_token));
}

#[tokio::test]
async fn test_signup_duplicate_email_returns_400() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("signup_duplicate");
    harness.signup(&builder).await;

    let response = harness
        .post_json(
            "/signup",
            json!({
                "email": builder.email("ada"),
                "password": "another",
                "name": "Imposter",
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(set_cookies(&response).is_empty());
    assert_eq!(json_body(response).await, json!({"message": "User already exists"}));
    assert_eq!(harness.users.len().await, 1);
}

#[tokio::test]
async fn test_signup_invalid_body_returns_400() {
    let harness = Harness::new();

    let response = harness
        .post_json(
            "/signup",
            json!({"email": "not-an-email", "password": "pw", "name": "Ada"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["details"]["email"].is_array());

    let response = harness
        .post_json("/signup", json!({"email": "ada@example.com"}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(harness.users.is_empty().await);
}

#[tokio::test]
async fn test_login_success_sets_cookies_and_replaces_session() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("login_success");
    let (user, _) = harness.signup(&builder).await;
    let user_id = user["id"].as_str().unwrap().to_string();

    harness
        .sessions
        .save(&user_id, "stale", REFRESH_TOKEN_TTL_SECS)
        .await
        .unwrap();

    let response = harness
        .post_json(
            "/login",
            json!({"email": builder.email("ada"), "password": builder.password()}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let refresh_token = cookie_value(&response, REFRESH_TOKEN_COOKIE);
    assert_cookie(&set_cookie(&response, ACCESS_TOKEN_COOKIE), ACCESS_TOKEN_COOKIE, 900);

    let body = json_body(response).await;
    assert_eq!(body, user);
    assert_eq!(
        harness.sessions.get(&user_id).await.unwrap(),
        Some(refresh_token)
    );
}

#[tokio::test]
async fn test_login_wrong_password_defaults_to_200_message() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("login_wrong_password");
    let (user, original_refresh) = harness.signup(&builder).await;
    let user_id = user["id"].as_str().unwrap();

    for _ in 0..5 {
        let response = harness
            .post_json(
                "/login",
                json!({"email": builder.email("ada"), "password": "wrong"}),
            )
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookies(&response).is_empty());
        assert_eq!(
            json_body(response).await,
            json!({"message": "Invalid email or password"})
        );
    }

    assert_eq!(
        harness.sessions.get(user_id).await.unwrap(),
        Some(original_refresh)
    );
}

#[tokio::test]
async fn test_login_unknown_email_same_message() {
    let harness = Harness::new();

    let response = harness
        .post_json(
            "/login",
            json!({"email": "nobody@example.com", "password": "whatever"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"message": "Invalid email or password"})
    );
    assert!(harness.sessions.is_empty().await);
}

#[tokio::test]
async fn test_login_strict_mode_returns_401() {
    let harness = Harness::with_config(test_config().with_reject_invalid_login(true));

    let response = harness
        .post_json(
            "/login",
            json!({"email": "nobody@example.com", "password": "whatever"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        json!({"message": "Invalid email or password"})
    );
}

#[tokio::test]
async fn test_login_empty_password_is_invalid_credentials() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("login_empty_password");
    harness.signup(&builder).await;

    let response = harness
        .post_json(
            "/login",
            json!({"email": builder.email("ada"), "password": ""}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response).is_empty());
    assert_eq!(
        json_body(response).await,
        json!({"message": "Invalid email or password"})
    );
}

#[tokio::test]
async fn test_login_empty_fields_strict_mode_returns_401() {
    let harness = Harness::with_config(test_config().with_reject_invalid_login(true));

    let response = harness
        .post_json("/login", json!({"email": "", "password": ""}))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        json!({"message": "Invalid email or password"})
    );
}

#[tokio::test]
async fn test_secure_cookies_in_production() {
    let harness = Harness::with_config(test_config().with_secure_cookies(true));
    let builder = TestDataBuilder::from_test_name("secure_cookies");

    let response = harness
        .post_json(
            "/signup",
            json!({"email": builder.email("ada"), "password": "pw", "name": "Ada"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    for cookie in set_cookies(&response) {
        assert!(cookie.contains("; Secure;"), "{}", cookie);
    }
}

#[tokio::test]
async fn test_logout_clears_cookies_and_session() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("logout");
    let (user, refresh) = harness.signup(&builder).await;
    let cookie = format!("{}={}", REFRESH_TOKEN_COOKIE, refresh);

    for _ in 0..2 {
        let response = harness.post_with_cookie("/logout", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_cookie(&set_cookie(&response, ACCESS_TOKEN_COOKIE), ACCESS_TOKEN_COOKIE, 0);
        assert_cookie(&set_cookie(&response, REFRESH_TOKEN_COOKIE), REFRESH_TOKEN_COOKIE, 0);
        assert_eq!(
            json_body(response).await,
            json!({"message": "Logged out successfully"})
        );
    }

    assert!(
        harness
            .sessions
            .get(user["id"].as_str().unwrap())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_logout_without_or_with_bad_cookie_is_ok() {
    let harness = Harness::new();

    let response = harness.post_with_cookie("/logout", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(set_cookies(&response).len(), 2);

    let response = harness
        .post_with_cookie("/logout", Some("refreshToken=garbage"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"message": "Logged out successfully"})
    );
}

#[tokio::test]
async fn test_refresh_issues_new_access_cookie_only() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("refresh_ok");
    let signed_up_at = Utc::now().timestamp();
    let (user, refresh) = harness.signup(&builder).await;
    let user_id = user["id"].as_str().unwrap();
    let cookie = format!("theme=dark; {}={}", REFRESH_TOKEN_COOKIE, refresh);

    let response = harness
        .post_with_cookie("/refresh-token", Some(&cookie))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert_cookie(&cookies[0], ACCESS_TOKEN_COOKIE, 900);

    let access = cookie_value(&response, ACCESS_TOKEN_COOKIE);
    assert_eq!(
        harness.service.tokens().verify_access(&access),
        TokenVerification::Valid(user_id.to_string())
    );
    let claims = jsonwebtoken::decode::<Claims>(
        &access,
        &DecodingKey::from_secret(ACCESS_SECRET.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .unwrap()
    .claims;
    assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_TTL_SECS as i64);
    assert!(claims.iat >= signed_up_at);
    assert_eq!(
        json_body(response).await,
        json!({"message": "Token refreshed successfully"})
    );
    assert_eq!(harness.sessions.get(user_id).await.unwrap(), Some(refresh));
}

#[tokio::test]
async fn test_refresh_without_cookie_returns_401() {
    let harness = Harness::new();

    let response = harness.post_with_cookie("/refresh-token", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        json!({"message": "Invalid refresh token provided"})
    );
}

#[tokio::test]
async fn test_refresh_malformed_returns_401() {
    let harness = Harness::new();

    let response = harness
        .post_with_cookie("/refresh-token", Some("refreshToken=abc.def.ghi"))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        json!({"message": "Invalid refresh token"})
    );
}

#[tokio::test]
async fn test_refresh_expired_returns_403() {
    let harness = Harness::new();
    let long_ago = Utc::now().timestamp() - REFRESH_TOKEN_TTL_SECS as i64 - 60;
    let expired = harness
        .service
        .tokens()
        .issue_pair_at("user-1", long_ago)
        .unwrap();

    let response = harness
        .post_with_cookie(
            "/refresh-token",
            Some(&format!("refreshToken={}", expired.refresh_token)),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        json_body(response).await,
        json!({"message": "Refresh token expired"})
    );
}

#[tokio::test]
async fn test_refresh_after_logout_returns_401() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("refresh_after_logout");
    let (_, refresh) = harness.signup(&builder).await;
    let cookie = format!("{}={}", REFRESH_TOKEN_COOKIE, refresh);

    let response = harness.post_with_cookie("/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = harness
        .post_with_cookie("/refresh-token", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        json!({"message": "Invalid refresh token"})
    );
}

#[tokio::test]
async fn test_refresh_with_superseded_token_returns_401() {
    let harness = Harness::new();
    let builder = TestDataBuilder::from_test_name("refresh_superseded");
    let (user, refresh) = harness.signup(&builder).await;

    harness
        .sessions
        .save(
            user["id"].as_str().unwrap(),
            "token-from-a-newer-login",
            REFRESH_TOKEN_TTL_SECS,
        )
        .await
        .unwrap();

    let response = harness
        .post_with_cookie(
            "/refresh-token",
            Some(&format!("{}={}", REFRESH_TOKEN_COOKIE, refresh)),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
