//! # Auth domain
//!
//! Email/password accounts with JWT access and refresh tokens delivered as
//! `HttpOnly` cookies.
//!
//! - **Users** live behind [`UserRepository`] ([`MongoUserRepository`] in
//!   production, [`InMemoryUserRepository`] for tests).
//! - **Sessions** map a user id to their single live refresh token behind
//!   [`SessionStore`] ([`RedisSessionStore`] / [`InMemorySessionStore`]),
//!   keyed `refresh_token:{userId}` with a 7 day TTL.
//! - **Tokens** are HS256 JWTs with a `userId` claim: 15 minute access
//!   tokens and 7 day refresh tokens, each signed with its own secret.
//!
//! A refresh token is only honoured while it equals the stored session, so a
//! newer login or a logout revokes it.
//!
//! ```ignore
//! let service = AuthService::new(
//!     MongoUserRepository::new(db),
//!     RedisSessionStore::new(redis),
//!     AuthConfig::from_env()?,
//! );
//! let app = Router::new().nest("/auth", domain_auth::router(service));
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod password;
pub mod repository;
pub mod service;
pub mod session;
pub mod tokens;

pub use config::{ACCESS_TOKEN_TTL_SECS, AuthConfig, REFRESH_TOKEN_TTL_SECS};
pub use error::{AuthError, AuthResult, LogoutFailure, RefreshFailure};
pub use handlers::{ACCESS_TOKEN_COOKIE, ApiDoc, REFRESH_TOKEN_COOKIE, router};
pub use models::{LoginRequest, MessageResponse, Role, SignupRequest, TokenPair, User, UserResponse};
pub use self::mongodb::MongoUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::{AuthService, LoginOutcome};
pub use session::{InMemorySessionStore, RedisSessionStore, SessionStore, session_key};
pub use tokens::{TokenService, TokenVerification};
