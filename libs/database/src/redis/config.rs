#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv};

const DEFAULT_PORT: u16 = 6379;

/// Redis connection settings.
///
/// `url` may be a full `redis://` / `rediss://` URL or a bare host name;
/// credentials and the database index are folded in by [`RedisConfig::build_url`].
#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub url: String,
    pub database: Option<u8>,
    /// Redis 6 ACL user
    pub username: Option<String>,
    pub password: Option<String>,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: None,
            username: None,
            password: None,
        }
    }

    pub fn with_auth(
        url: impl Into<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        Self {
            username,
            password,
            ..Self::new(url)
        }
    }

    pub fn with_database(url: impl Into<String>, database: u8) -> Self {
        Self {
            database: Some(database),
            ..Self::new(url)
        }
    }

    /// Full connection URL including credentials and database index.
    ///
    /// Credentials already present in `url` win over `username`/`password`,
    /// and an explicit path in `url` wins over `database`.
    ///
    /// ```ignore
    /// let config = RedisConfig::with_auth("cache", None, Some("s3cret".into()));
    /// assert_eq!(config.build_url(), "redis://:s3cret@cache:6379");
    /// ```
    pub fn build_url(&self) -> String {
        let (scheme, rest) = match self.url.split_once("://") {
            Some((scheme, rest)) => (scheme, rest),
            None => ("redis", self.url.as_str()),
        };

        let (authority, path) = match rest.split_once('/') {
            Some((authority, path)) => (authority, path),
            None => (rest, ""),
        };

        let mut host = authority.to_string();
        if !host.contains('@') && !host.contains(':') {
            host = format!("{host}:{DEFAULT_PORT}");
        }

        let credentials = if authority.contains('@') {
            String::new()
        } else {
            match (&self.username, &self.password) {
                (Some(user), Some(pass)) => format!(
                    "{}:{}@",
                    urlencoding::encode(user),
                    urlencoding::encode(pass)
                ),
                (None, Some(pass)) => format!(":{}@", urlencoding::encode(pass)),
                (Some(user), None) => format!("{}@", urlencoding::encode(user)),
                (None, None) => String::new(),
            }
        };

        let path = match (path.is_empty(), self.database) {
            (false, _) => format!("/{path}"),
            (true, Some(db)) => format!("/{db}"),
            (true, None) => String::new(),
        };

        format!("{scheme}://{credentials}{host}{path}")
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self::new("redis://127.0.0.1:6379")
    }
}

/// Environment variables:
/// - `REDIS_URL` or `REDIS_HOST` (required): URL or bare host name
/// - `REDIS_PORT` (optional): port used with a bare host name
/// - `REDIS_DATABASE` (optional): database index
/// - `REDIS_USERNAME` / `REDIS_PASSWORD` (optional)
#[cfg(feature = "config")]
impl FromEnv for RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut url = std::env::var("REDIS_URL")
            .or_else(|_| std::env::var("REDIS_HOST"))
            .map_err(|_| ConfigError::MissingEnvVar("REDIS_URL or REDIS_HOST".to_string()))?;

        if !url.contains("://") {
            if let Ok(port) = std::env::var("REDIS_PORT") {
                let port: u16 = port.parse().map_err(|e| ConfigError::ParseError {
                    key: "REDIS_PORT".to_string(),
                    details: format!("{}", e),
                })?;
                url = format!("{url}:{port}");
            }
        }

        let database = match std::env::var("REDIS_DATABASE") {
            Ok(db) => Some(db.parse().map_err(|e| ConfigError::ParseError {
                key: "REDIS_DATABASE".to_string(),
                details: format!("{}", e),
            })?),
            Err(_) => None,
        };

        Ok(Self {
            url,
            database,
            username: std::env::var("REDIS_USERNAME").ok().filter(|v| !v.is_empty()),
            password: std::env::var("REDIS_PASSWORD").ok().filter(|v| !v.is_empty()),
        })
    }
}
