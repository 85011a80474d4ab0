//! JWT session token issuance/verification and opaque refresh token
//! generation.
//!
//! Session tokens are signed with HMAC-SHA256 over a symmetric secret.
//! No issuer or audience validation is performed — tenant scoping is
//! carried by the `tenant` claim and enforced by the stores.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use campus_core::models::user::User;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// JWT claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject — user ID (UUID string).
    pub sub: String,
    pub email: String,
    /// First name.
    pub name: String,
    /// Last name.
    pub surname: String,
    pub phone: String,
    /// Tenant ID.
    pub tenant: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Issue a signed HS256 session token for `user` within `tenant_id`.
pub fn issue_session_token(
    user: &User,
    tenant_id: &str,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = SessionClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        name: user.first_name.clone(),
        surname: user.last_name.clone(),
        phone: user.phone_number.clone().unwrap_or_default(),
        tenant: tenant_id.to_string(),
        iat: now,
        exp: now + (config.token_lifetime_mins * 60) as i64,
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    let header = Header::new(Algorithm::HS256);
    jsonwebtoken::encode(&header, &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and fully verify a session token (signature, algorithm,
/// expiry).
pub fn decode_session_token(
    token: &str,
    config: &AuthConfig,
) -> Result<SessionClaims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    jsonwebtoken::decode::<SessionClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AuthError::TokenInvalid("token has expired".into())
            }
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

/// Decode a session token checking signature and algorithm ONLY.
///
/// Expiry is deliberately not validated: the refresh flow operates on
/// an expired-but-validly-signed session token.
pub fn decode_expired_token(
    token: &str,
    config: &AuthConfig,
) -> Result<SessionClaims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.set_required_spec_claims::<&str>(&[]);

    jsonwebtoken::decode::<SessionClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::TokenInvalid(e.to_string()))
}

/// Validated JWT claims — a newtype proving the token was verified.
///
/// Used by the API layer to extract authenticated context from
/// incoming requests.
#[derive(Debug, Clone)]
pub struct ValidatedClaims(pub SessionClaims);

/// Validate a session token (signature, algorithm, expiry) and return
/// the verified claims.
///
/// This is the entry point for request-level authentication
/// middleware. It is purely stateless — no database lookup is
/// performed.
pub fn validate_session_token(
    token: &str,
    config: &AuthConfig,
) -> Result<ValidatedClaims, AuthError> {
    decode_session_token(token, config).map(ValidatedClaims)
}

/// Generate a cryptographically random opaque refresh token
/// (32 bytes → base64url-encoded, no padding).
pub fn generate_refresh_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rand::Rng::random(&mut rng);
    URL_SAFE_NO_PAD.encode(bytes)
}
