//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Auth API",
        version = "0.1.0",
        description = "Email/password authentication with JWT cookies, MongoDB users and Redis sessions",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/auth", api = domain_auth::ApiDoc)
    ),
    tags(
        (name = "Auth", description = "Signup, login, logout and token refresh")
    )
)]
pub struct ApiDoc;
