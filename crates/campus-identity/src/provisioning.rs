//! Tenant provisioning — default roles, their permission tiers, and
//! the tenant admin user.
//!
//! Seeding is additive and idempotent: existing roles, claims and
//! users are left in place, only what is missing gets created.

use std::collections::HashSet;

use campus_core::error::{CampusError, CampusResult};
use campus_core::models::role::CreateRole;
use campus_core::models::tenant::Tenant;
use campus_core::models::user::CreateUser;
use campus_core::permissions::{self, Permission};
use campus_core::repository::{RoleClaimRepository, RoleRepository, UserRepository};
use campus_core::roles;
use uuid::Uuid;

/// Seeding configuration.
///
/// The admin password is deliberately configuration, not a constant —
/// deployments must choose their own.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Password assigned to newly created tenant admin users.
    pub default_password: String,
    pub admin_first_name: String,
    pub admin_last_name: String,
}

/// Seeds a tenant's roles, permission claims, and admin user.
pub struct TenantSeeder<R, C, U>
where
    R: RoleRepository,
    C: RoleClaimRepository,
    U: UserRepository,
{
    role_repo: R,
    claim_repo: C,
    user_repo: U,
    config: SeedConfig,
}

impl<R, C, U> TenantSeeder<R, C, U>
where
    R: RoleRepository,
    C: RoleClaimRepository,
    U: UserRepository,
{
    pub fn new(role_repo: R, claim_repo: C, user_repo: U, config: SeedConfig) -> Self {
        Self {
            role_repo,
            claim_repo,
            user_repo,
            config,
        }
    }

    /// Provision the tenant: default roles with their permission
    /// tiers, then the admin user (when the tenant declares one).
    pub async fn seed(&self, tenant: &Tenant) -> CampusResult<()> {
        self.seed_default_roles(&tenant.id).await?;
        self.seed_admin_user(tenant).await
    }

    async fn seed_default_roles(&self, tenant_id: &str) -> CampusResult<()> {
        for role_name in roles::DEFAULT_ROLES {
            let role = match self.role_repo.get_by_name(tenant_id, role_name).await {
                Ok(role) => role,
                Err(CampusError::NotFound { .. }) => {
                    self.role_repo
                        .create(CreateRole {
                            tenant_id: tenant_id.to_string(),
                            name: role_name.to_string(),
                            description: format!("{role_name} Role"),
                        })
                        .await?
                }
                Err(e) => return Err(e),
            };

            let tier = match role_name {
                roles::BASIC => permissions::basic(),
                roles::ADMIN => permissions::admin(),
                _ => continue,
            };

            self.grant_missing(tenant_id, role.id, &tier).await?;
        }

        Ok(())
    }

    /// Grant every permission of `tier` the role does not hold yet.
    /// Existing claims are never removed here.
    async fn grant_missing(
        &self,
        tenant_id: &str,
        role_id: Uuid,
        tier: &[Permission],
    ) -> CampusResult<()> {
        let current: HashSet<String> = self
            .claim_repo
            .list_for_role(tenant_id, role_id)
            .await?
            .into_iter()
            .filter(|c| c.claim_type == permissions::CLAIM_TYPE)
            .map(|c| c.claim_value)
            .collect();

        let missing: Vec<String> = tier
            .iter()
            .map(|p| p.name())
            .filter(|name| !current.contains(name))
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        self.claim_repo
            .apply_diff(
                tenant_id,
                role_id,
                permissions::CLAIM_TYPE,
                missing,
                Vec::new(),
            )
            .await
    }

    async fn seed_admin_user(&self, tenant: &Tenant) -> CampusResult<()> {
        let Some(admin_email) = tenant.admin_email.as_deref() else {
            return Ok(());
        };

        let user = match self.user_repo.get_by_email(&tenant.id, admin_email).await {
            Ok(user) => user,
            Err(CampusError::NotFound { .. }) => {
                self.user_repo
                    .create(CreateUser {
                        tenant_id: tenant.id.clone(),
                        email: admin_email.to_string(),
                        first_name: self.config.admin_first_name.clone(),
                        last_name: self.config.admin_last_name.clone(),
                        phone_number: None,
                        password: self.config.default_password.clone(),
                        is_active: true,
                        email_confirmed: true,
                        phone_confirmed: true,
                    })
                    .await?
            }
            Err(e) => return Err(e),
        };

        let admin_role = self.role_repo.get_by_name(&tenant.id, roles::ADMIN).await?;
        if !self
            .role_repo
            .is_member(&tenant.id, user.id, admin_role.id)
            .await?
        {
            self.role_repo
                .assign_to_user(&tenant.id, user.id, admin_role.id)
                .await?;
        }

        Ok(())
    }
}
