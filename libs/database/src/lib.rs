//! Connection helpers for the stores backing the auth service.
//!
//! # Features
//!
//! - `redis` (default) - Redis session cache
//! - `mongodb` (default) - MongoDB user store
//! - `config` - `core_config::FromEnv` implementations for the config structs
//!
//! # Examples
//!
//! ```ignore
//! use database::redis::{self, RedisConfig};
//!
//! let config = RedisConfig::new("redis://127.0.0.1:6379");
//! let conn = redis::connect_from_config_with_retry(&config, None).await?;
//! ```
//!
//! ```ignore
//! use database::mongodb::{self, MongoConfig};
//!
//! let config = MongoConfig::new("mongodb://localhost:27017", "auth");
//! let client = mongodb::connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(&config.database);
//! ```

pub mod common;

#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
