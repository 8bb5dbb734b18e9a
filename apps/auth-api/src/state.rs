//! Shared application state handed to the route builders.

use database::redis::ConnectionManager;
use mongodb::{Client, Database};

/// Cloned per router; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// MongoDB client (shares the underlying connection pool)
    pub mongo_client: Client,
    pub db: Database,
    /// Multiplexed Redis connection holding the session records
    pub redis: ConnectionManager,
}
