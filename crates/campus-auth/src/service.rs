//! Token service — login and refresh orchestration.

use campus_core::error::CampusResult;
use campus_core::models::tenant::Tenant;
use campus_core::models::user::User;
use campus_core::repository::UserRepository;
use chrono::{DateTime, Duration, Utc};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// A freshly minted session token pair.
#[derive(Debug)]
pub struct TokenPair {
    /// Signed JWT session token.
    pub token: String,
    /// Opaque refresh token, also persisted on the user record.
    pub refresh_token: String,
    /// Expiry of the refresh token.
    pub refresh_token_expires_at: DateTime<Utc>,
}

/// Token service.
///
/// Generic over the user repository so that the auth layer has no
/// dependency on the database crate. The tenant is resolved per
/// request by the caller and passed in explicitly.
pub struct TokenService<U: UserRepository> {
    user_repo: U,
    config: AuthConfig,
}

impl<U: UserRepository> TokenService<U> {
    pub fn new(user_repo: U, config: AuthConfig) -> Self {
        Self { user_repo, config }
    }

    /// Authenticate a user with email + password and issue a token pair.
    pub async fn login(&self, tenant: &Tenant, input: LoginInput) -> CampusResult<TokenPair> {
        // 1. Look up user by email.
        let user = self
            .user_repo
            .get_by_email(&tenant.id, &input.email)
            .await
            .map_err(|_| AuthError::AuthenticationFailed)?;

        // 2. Verify password.
        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;

        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Check account status.
        if !user.is_active {
            return Err(AuthError::AccountInactive.into());
        }

        // 4. Check tenant subscription — the root tenant never expires.
        if !tenant.subscription_valid_at(Utc::now()) {
            return Err(AuthError::SubscriptionExpired.into());
        }

        self.mint(tenant, user).await
    }

    /// Exchange an expired session token for a new token pair.
    ///
    /// Only the signature and algorithm of the presented token are
    /// validated — its expiry is not, since refresh by definition
    /// operates on an expired token.
    pub async fn refresh(&self, tenant: &Tenant, expired_token: &str) -> CampusResult<TokenPair> {
        let claims = token::decode_expired_token(expired_token, &self.config)?;

        let user = self
            .user_repo
            .get_by_email(&tenant.id, &claims.email)
            .await
            .map_err(|_| AuthError::AuthenticationFailed)?;

        self.mint(tenant, user).await
    }

    /// Mint a session token and rotate the stored refresh token.
    async fn mint(&self, tenant: &Tenant, user: User) -> CampusResult<TokenPair> {
        let jwt = token::issue_session_token(&user, &tenant.id, &self.config)?;

        let refresh_token = token::generate_refresh_token();
        let refresh_token_expires_at =
            Utc::now() + Duration::days(self.config.refresh_token_lifetime_days as i64);

        // Overwrites any prior token — a user holds one active refresh
        // token at a time.
        self.user_repo
            .set_refresh_token(
                &tenant.id,
                user.id,
                refresh_token.clone(),
                refresh_token_expires_at,
            )
            .await?;

        Ok(TokenPair {
            token: jwt,
            refresh_token,
            refresh_token_expires_at,
        })
    }
}
