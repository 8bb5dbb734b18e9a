//! HTTP-level helpers: CORS, security headers and auth cookies.
//!
//! ```ignore
//! use axum_helpers::http::{create_cors_layer, security_headers};
//!
//! let app = Router::new()
//!     .layer(axum::middleware::from_fn(security_headers))
//!     .layer(create_cors_layer(origins));
//! ```

pub mod cookies;
pub mod cors;
pub mod security;

pub use cookies::{clear_cookie, read_cookie, session_cookie};
pub use cors::{create_cors_layer, parse_allowed_origins};
pub use security::security_headers;
