use std::sync::Arc;
use tracing::instrument;

use crate::config::{AuthConfig, REFRESH_TOKEN_TTL_SECS};
use crate::error::{AuthError, AuthResult};
use crate::models::{LoginRequest, NewUser, SignupRequest, TokenPair, UserResponse, normalize_email};
use crate::password;
use crate::repository::UserRepository;
use crate::session::SessionStore;
use crate::tokens::{TokenService, TokenVerification};

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Result of a login attempt that reached the user store.
#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated(UserResponse, TokenPair),
    /// Unknown email or wrong password. Nothing was issued or stored.
    InvalidCredentials,
}

/// Signup, login, logout and refresh over a user store and a session store.
pub struct AuthService<R: UserRepository, S: SessionStore> {
    users: Arc<R>,
    sessions: Arc<S>,
    tokens: TokenService,
    config: AuthConfig,
}

impl<R: UserRepository, S: SessionStore> Clone for AuthService<R, S> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            sessions: Arc::clone(&self.sessions),
            tokens: self.tokens.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R: UserRepository, S: SessionStore> AuthService<R, S> {
    pub fn new(users: R, sessions: S, config: AuthConfig) -> Self {
        Self {
            users: Arc::new(users),
            sessions: Arc::new(sessions),
            tokens: TokenService::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Sign a pair and make its refresh token the user's only live session.
    #[instrument(skip(self))]
    pub async fn issue_tokens(&self, user_id: &str) -> AuthResult<TokenPair> {
        let pair = self.tokens.issue_pair(user_id)?;
        self.sessions
            .save(user_id, &pair.refresh_token, REFRESH_TOKEN_TTL_SECS)
            .await?;
        Ok(pair)
    }

    #[instrument(skip(self, input))]
    pub async fn signup(&self, input: SignupRequest) -> AuthResult<(UserResponse, TokenPair)> {
        let email = normalize_email(&input.email);

        if self.users.find_by_email(&email).await?.is_some() {
            tracing::info!("Signup rejected: email taken");
            return Err(AuthError::UserExists);
        }

        let user = self
            .users
            .create(NewUser {
                name: input.name,
                email,
                password_hash: password::hash_password(&input.password)?,
            })
            .await?;

        let pair = self.issue_tokens(&user.id.to_string()).await?;
        tracing::info!(user_id = %user.id, "User signed up");
        Ok((user.into(), pair))
    }

    #[instrument(skip(self, input))]
    pub async fn login(&self, input: LoginRequest) -> AuthResult<LoginOutcome> {
        let email = normalize_email(&input.email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            password::verify_dummy(&input.password);
            tracing::info!("Login rejected: unknown email");
            return Ok(LoginOutcome::InvalidCredentials);
        };

        if !user.compare_password(&input.password) {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Ok(LoginOutcome::InvalidCredentials);
        }

        let pair = self.issue_tokens(&user.id.to_string()).await?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginOutcome::Authenticated(user.into(), pair))
    }

    /// End the session named by `refresh_token`, if it names one.
    ///
    /// A missing, malformed or expired token is not an error; only a failing
    /// session store is.
    #[instrument(skip(self, refresh_token))]
    pub async fn logout(&self, refresh_token: Option<&str>) -> AuthResult<()> {
        let Some(token) = refresh_token else {
            tracing::debug!("Logout without refresh cookie");
            return Ok(());
        };

        match self.tokens.verify_refresh(token) {
            TokenVerification::Valid(user_id) => {
                self.sessions.delete(&user_id).await?;
                tracing::info!(%user_id, "User logged out");
            }
            other => {
                tracing::info!(outcome = ?other, "Logout with unusable refresh cookie");
            }
        }

        Ok(())
    }

    /// Mint a new access token for a refresh token that matches the stored session.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: Option<&str>) -> AuthResult<String> {
        let token = refresh_token.ok_or(AuthError::MissingRefreshToken)?;

        let user_id = match self.tokens.verify_refresh(token) {
            TokenVerification::Valid(user_id) => user_id,
            TokenVerification::Expired => return Err(AuthError::RefreshTokenExpired),
            TokenVerification::Invalid => return Err(AuthError::InvalidRefreshToken),
            TokenVerification::Error(msg) => return Err(AuthError::Token(msg)),
        };

        let stored = self.sessions.get(&user_id).await?;
        if stored.as_deref() != Some(token) {
            tracing::info!(%user_id, "Refresh token does not match the live session");
            return Err(AuthError::InvalidRefreshToken);
        }

        let access_token = self.tokens.sign_access(&user_id)?;
        tracing::info!(%user_id, "Access token refreshed");
        Ok(access_token)
    }
}
