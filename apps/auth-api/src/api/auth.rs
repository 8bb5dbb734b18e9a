//! Auth API routes
//!
//! Wires the auth domain to MongoDB users and Redis sessions.

use axum::Router;
use domain_auth::{AuthService, MongoUserRepository, RedisSessionStore, handlers};
use mongodb::Database;

use crate::state::AppState;

/// Ensure the unique email index before serving
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoUserRepository::new(db.clone()).create_indexes().await?;
    Ok(())
}

/// Create auth router
pub fn router(state: &AppState) -> Router {
    let users = MongoUserRepository::new(state.db.clone());
    let sessions = RedisSessionStore::new(state.redis.clone());
    let service = AuthService::new(users, sessions, state.config.auth.clone());

    handlers::router(service)
}
