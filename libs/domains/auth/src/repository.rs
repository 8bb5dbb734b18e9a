use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{AuthError, AuthResult};
use crate::models::{NewUser, User};

/// Repository trait for User persistence
///
/// Emails arrive already normalized; implementations compare them as-is.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by email
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Insert a new user. A taken email yields [`AuthError::UserExists`].
    async fn create(&self, input: NewUser) -> AuthResult<User>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(email).cloned())
    }

    async fn create(&self, input: NewUser) -> AuthResult<User> {
        let mut users = self.users.write().await;

        if users.contains_key(&input.email) {
            return Err(AuthError::UserExists);
        }

        let user = User::new(input);
        users.insert(user.email.clone(), user.clone());

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }
}
