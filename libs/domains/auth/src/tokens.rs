//! JWT signing and verification for access and refresh tokens.

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};

use crate::config::{ACCESS_TOKEN_TTL_SECS, AuthConfig, REFRESH_TOKEN_TTL_SECS};
use crate::error::{AuthError, AuthResult};
use crate::models::{Claims, TokenPair};

// Lifetimes as offsets on i64 JWT timestamps.
const ACCESS_TTL: i64 = ACCESS_TOKEN_TTL_SECS as i64;
const REFRESH_TTL: i64 = REFRESH_TOKEN_TTL_SECS as i64;

/// Outcome of checking a presented token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenVerification {
    /// Signature and expiry check out; carries the `userId` claim.
    Valid(String),
    Expired,
    /// Malformed, tampered, or signed with another secret.
    Invalid,
    /// Anything else the verifier reported.
    Error(String),
}

/// HS256 signer/verifier holding one key pair per token kind.
#[derive(Clone)]
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            access_encoding: EncodingKey::from_secret(config.access_token_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_token_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            validation,
        }
    }

    /// Sign a fresh access/refresh pair for `user_id`.
    pub fn issue_pair(&self, user_id: &str) -> AuthResult<TokenPair> {
        self.issue_pair_at(user_id, Utc::now().timestamp())
    }

    /// Sign a pair as if issued at the unix time `issued_at`.
    pub fn issue_pair_at(&self, user_id: &str, issued_at: i64) -> AuthResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.sign_access_at(user_id, issued_at)?,
            refresh_token: sign(&self.refresh_encoding, user_id, issued_at, REFRESH_TTL)?,
        })
    }

    pub fn sign_access(&self, user_id: &str) -> AuthResult<String> {
        self.sign_access_at(user_id, Utc::now().timestamp())
    }

    fn sign_access_at(&self, user_id: &str, issued_at: i64) -> AuthResult<String> {
        sign(&self.access_encoding, user_id, issued_at, ACCESS_TTL)
    }

    pub fn verify_access(&self, token: &str) -> TokenVerification {
        self.verify(token, &self.access_decoding)
    }

    pub fn verify_refresh(&self, token: &str) -> TokenVerification {
        self.verify(token, &self.refresh_decoding)
    }

    fn verify(&self, token: &str, key: &DecodingKey) -> TokenVerification {
        match decode::<Claims>(token, key, &self.validation) {
            Ok(data) => TokenVerification::Valid(data.claims.user_id),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => TokenVerification::Expired,
                ErrorKind::InvalidToken
                | ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::MissingRequiredClaim(_)
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => TokenVerification::Invalid,
                _ => TokenVerification::Error(e.to_string()),
            },
        }
    }
}

fn sign(key: &EncodingKey, user_id: &str, issued_at: i64, ttl: i64) -> AuthResult<String> {
    let claims = Claims {
        user_id: user_id.to_string(),
        iat: issued_at,
        exp: issued_at + ttl,
    };

    encode(&Header::new(Algorithm::HS256), &claims, key)
        .map_err(|e| AuthError::Token(e.to_string()))
}
