//! # Axum Helpers
//!
//! Shared HTTP plumbing for the auth service.
//!
//! - **[`server`]**: router assembly with OpenAPI UIs, health endpoints, graceful shutdown
//! - **[`http`]**: CORS, security headers, auth cookie helpers
//! - **[`errors`]**: the JSON error body and log error codes
//! - **[`extractors`]**: validated JSON bodies
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::app_info;
//!
//! let router = create_router::<ApiDoc>(api_routes)?.merge(health_router(app_info!()));
//! create_production_app(router, &config.server, Duration::from_secs(30), async {}).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    CleanupCoordinator, HealthCheckFuture, HealthResponse, create_production_app, create_router,
    create_router_with_origins, health_router, run_health_checks, serve_until, shutdown_signal,
};

pub use http::{clear_cookie, read_cookie, security_headers, session_cookie};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::ValidatedJson;
