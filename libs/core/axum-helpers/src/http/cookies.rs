//! `Set-Cookie` builders and a `Cookie` header reader for the auth cookies.
//!
//! Every cookie is `HttpOnly; SameSite=Strict; Path=/`, plus `Secure`
//! when the caller runs behind HTTPS.

use axum::http::{HeaderMap, HeaderValue, header};

/// `Set-Cookie` value for a cookie that lives `max_age_secs` seconds.
pub fn session_cookie(
    name: &str,
    value: &str,
    max_age_secs: u64,
    secure: bool,
) -> Result<HeaderValue, header::InvalidHeaderValue> {
    let secure = if secure { " Secure;" } else { "" };
    HeaderValue::from_str(&format!(
        "{name}={value}; HttpOnly;{secure} SameSite=Strict; Path=/; Max-Age={max_age_secs}"
    ))
}

/// `Set-Cookie` value that expires `name` immediately.
pub fn clear_cookie(name: &str, secure: bool) -> Result<HeaderValue, header::InvalidHeaderValue> {
    session_cookie(name, "", 0, secure)
}

/// First value of cookie `name` across all `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
        .filter(|value| !value.is_empty())
}
