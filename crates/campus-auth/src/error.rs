//! Authentication error types.

use campus_core::error::CampusError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("incorrect credentials")]
    InvalidCredentials,

    #[error("user is not active, please contact the admin")]
    AccountInactive,

    #[error("tenant subscription has expired, please contact the admin")]
    SubscriptionExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for CampusError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed
            | AuthError::InvalidCredentials
            | AuthError::AccountInactive
            | AuthError::SubscriptionExpired
            | AuthError::TokenInvalid(_) => CampusError::Unauthorized {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => CampusError::Crypto(msg),
        }
    }
}
