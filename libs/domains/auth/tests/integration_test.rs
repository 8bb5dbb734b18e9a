//! End-to-end flow against real MongoDB and Redis containers.
//!
//! Run with `cargo test -p domain_auth -- --ignored` on a machine with Docker.

use domain_auth::*;
use redis::AsyncCommands;
use test_utils::{TestDataBuilder, TestMongo, TestRedis};

fn test_config() -> AuthConfig {
    AuthConfig::new(
        "access-secret-access-secret-access-secret",
        "refresh-secret-refresh-secret-refresh-secret",
    )
    .unwrap()
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_signup_login_refresh_logout_flow() {
    let mongo = TestMongo::new().await;
    let redis = TestRedis::new().await;

    let users = MongoUserRepository::new(mongo.database("auth_flow"));
    users.create_indexes().await.unwrap();
    let sessions = RedisSessionStore::new(redis.connection());
    let service = AuthService::new(users, sessions, test_config());

    let builder = TestDataBuilder::from_test_name("full_flow");
    let (user, signup_pair) = service
        .signup(SignupRequest {
            email: builder.email("ada"),
            password: builder.password(),
            name: "Ada".to_string(),
        })
        .await
        .unwrap();

    let duplicate = service
        .signup(SignupRequest {
            email: builder.email("ada"),
            password: builder.password(),
            name: "Ada".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(duplicate, AuthError::UserExists));

    let mut conn = redis.connection();
    let key = session_key(&user.id.to_string());
    let stored: Option<String> = conn.get(&key).await.unwrap();
    assert_eq!(stored, Some(signup_pair.refresh_token.clone()));
    let ttl: i64 = conn.ttl(&key).await.unwrap();
    assert!(ttl > 0 && ttl <= REFRESH_TOKEN_TTL_SECS as i64);

    let outcome = service
        .login(LoginRequest {
            email: builder.email("ada"),
            password: builder.password(),
        })
        .await
        .unwrap();
    let LoginOutcome::Authenticated(_, pair) = outcome else {
        panic!("expected successful login");
    };

    let access = service.refresh(Some(&pair.refresh_token)).await.unwrap();
    assert!(matches!(
        service.tokens().verify_access(&access),
        TokenVerification::Valid(_)
    ));

    service.logout(Some(&pair.refresh_token)).await.unwrap();
    let exists: bool = conn.exists(&key).await.unwrap();
    assert!(!exists);

    let err = service.refresh(Some(&pair.refresh_token)).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidRefreshToken));
}
