use core_config::{ConfigError, Environment, FromEnv, env_flag, env_required};

/// Access tokens live 15 minutes.
pub const ACCESS_TOKEN_TTL_SECS: u64 = 15 * 60;

/// Refresh tokens, and the session record holding them, live 7 days.
pub const REFRESH_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

const MIN_SECRET_LEN: usize = 32;

/// Token secrets and auth behaviour switches.
///
/// Loaded from environment variables:
/// - `ACCESS_TOKEN_SECRET` (required, at least 32 characters)
/// - `REFRESH_TOKEN_SECRET` (required, at least 32 characters, different from the access secret)
/// - `AUTH_REJECT_INVALID_LOGIN` (optional, default `false`): answer failed logins with 401 instead of 200
/// - `APP_ENV`: `production` marks cookies `Secure`
#[derive(Clone)]
pub struct AuthConfig {
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub reject_invalid_login: bool,
    pub secure_cookies: bool,
}

impl AuthConfig {
    pub fn new(
        access_token_secret: impl Into<String>,
        refresh_token_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            access_token_secret: access_token_secret.into(),
            refresh_token_secret: refresh_token_secret.into(),
            reject_invalid_login: false,
            secure_cookies: false,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_reject_invalid_login(mut self, reject: bool) -> Self {
        self.reject_invalid_login = reject;
        self
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_secret("ACCESS_TOKEN_SECRET", &self.access_token_secret)?;
        check_secret("REFRESH_TOKEN_SECRET", &self.refresh_token_secret)?;

        if self.access_token_secret == self.refresh_token_secret {
            return Err(ConfigError::ParseError {
                key: "REFRESH_TOKEN_SECRET".to_string(),
                details: "must differ from ACCESS_TOKEN_SECRET".to_string(),
            });
        }

        Ok(())
    }
}

fn check_secret(key: &str, secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::ParseError {
            key: key.to_string(),
            details: format!(
                "must be at least {} characters (got {}). Generate one with: openssl rand -base64 32",
                MIN_SECRET_LEN,
                secret.len()
            ),
        });
    }
    Ok(())
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_secret", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .field("reject_invalid_login", &self.reject_invalid_login)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

impl FromEnv for AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let config = Self::new(
            env_required("ACCESS_TOKEN_SECRET")?,
            env_required("REFRESH_TOKEN_SECRET")?,
        )?;

        Ok(config
            .with_reject_invalid_login(env_flag("AUTH_REJECT_INVALID_LOGIN", false)?)
            .with_secure_cookies(Environment::from_env().use_https()))
    }
}
