//! Shared test utilities for the auth workspace
//!
//! - `TestRedis`: Redis container with automatic cleanup (feature: "redis")
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//! - `TestDataBuilder`: deterministic test data (always available)
//! - `assertions`: custom assertion helpers (always available)
//!
//! Container-backed tests need Docker; mark them `#[ignore]` so the default
//! `cargo test` run stays hermetic.
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["redis", "mongo"] }
//! ```
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestRedis};
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn stores_session() {
//!     let redis = TestRedis::new().await;
//!     let builder = TestDataBuilder::from_test_name("stores_session");
//!     let store = RedisSessionStore::new(redis.connection());
//!     store.save(&builder.user_id().to_string(), "token", 60).await.unwrap();
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "redis")]
mod redis;

#[cfg(feature = "mongo")]
pub use self::mongo::TestMongo;

#[cfg(feature = "redis")]
pub use self::redis::TestRedis;

/// Builder for test data with deterministic randomization
///
/// Two builders with the same seed produce the same ids, emails and names,
/// so failures are reproducible.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name, the usual way to get per-test data.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_signup_conflict");
    /// assert!(builder.email("alice").ends_with("@example.com"));
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn user_id(&self) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }

    /// `"test-{prefix}-{seed}-{suffix}"`
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Unique, valid email address for `local`.
    pub fn email(&self, local: &str) -> String {
        format!("{}.{}@example.com", local, self.seed)
    }

    /// Password that differs per seed.
    pub fn password(&self) -> String {
        format!("pw-{:x}", self.seed)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Unwrap `Some` with a readable panic message
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert a `Set-Cookie` header value carries `name` and `Max-Age=max_age`
    pub fn assert_cookie(set_cookie: &str, name: &str, max_age: u64) {
        assert!(
            set_cookie.starts_with(&format!("{}=", name)),
            "expected cookie '{}', got '{}'",
            name,
            set_cookie
        );
        assert!(
            set_cookie.contains(&format!("Max-Age={}", max_age)),
            "cookie '{}': expected Max-Age={}, got '{}'",
            name,
            max_age,
            set_cookie
        );
    }
}
