//! Session records: one live refresh token per user.

use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};
use tracing::instrument;

use crate::error::AuthResult;

/// Cache key holding the current refresh token for `user_id`.
pub fn session_key(user_id: &str) -> String {
    format!("refresh_token:{}", user_id)
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `refresh_token` for the user, replacing any previous one.
    async fn save(&self, user_id: &str, refresh_token: &str, ttl_secs: u64) -> AuthResult<()>;

    /// Current refresh token for the user, if the record is still alive.
    async fn get(&self, user_id: &str) -> AuthResult<Option<String>>;

    /// Drop the user's record. Deleting a missing record is not an error.
    async fn delete(&self, user_id: &str) -> AuthResult<()>;
}

/// Redis-backed session store. Records expire through the key TTL.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    #[instrument(skip(self, refresh_token))]
    async fn save(&self, user_id: &str, refresh_token: &str, ttl_secs: u64) -> AuthResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(session_key(user_id), refresh_token, ttl_secs)
            .await?;
        tracing::debug!("Session stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, user_id: &str) -> AuthResult<Option<String>> {
        let mut conn = self.conn.clone();
        let token: Option<String> = conn.get(session_key(user_id)).await?;
        Ok(token)
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: &str) -> AuthResult<()> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(session_key(user_id)).await?;
        tracing::debug!(removed, "Session deleted");
        Ok(())
    }
}

/// In-memory session store (for development/testing), honouring TTLs.
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    entries: Arc<RwLock<HashMap<String, (String, Instant)>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unexpired records.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remaining lifetime of the user's record.
    pub async fn ttl(&self, user_id: &str) -> Option<Duration> {
        let entries = self.entries.read().await;
        let (_, expires_at) = entries.get(&session_key(user_id))?;
        expires_at.checked_duration_since(Instant::now())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(&self, user_id: &str, refresh_token: &str, ttl_secs: u64) -> AuthResult<()> {
        let expires_at = Instant::now() + Duration::from_secs(ttl_secs);
        self.entries
            .write()
            .await
            .insert(session_key(user_id), (refresh_token.to_string(), expires_at));
        Ok(())
    }

    async fn get(&self, user_id: &str) -> AuthResult<Option<String>> {
        let entries = self.entries.read().await;
        let token = entries
            .get(&session_key(user_id))
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(token, _)| token.clone());
        Ok(token)
    }

    async fn delete(&self, user_id: &str) -> AuthResult<()> {
        self.entries.write().await.remove(&session_key(user_id));
        Ok(())
    }
}
