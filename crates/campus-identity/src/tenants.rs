//! Tenant lifecycle — creation with provisioning, activation,
//! subscription renewal, and root-tenant bootstrap.

use campus_core::error::{CampusError, CampusResult};
use campus_core::models::tenant::{CreateTenant, Tenant, UpdateTenant};
use campus_core::repository::{
    RoleClaimRepository, RoleRepository, TenantRepository, UserRepository,
};
use campus_core::tenancy;
use chrono::{DateTime, Duration, Utc};

use crate::provisioning::TenantSeeder;

/// Input for tenant creation. The identifier doubles as the tenant id.
#[derive(Debug, Clone)]
pub struct CreateTenantInput {
    pub identifier: String,
    pub name: String,
    pub admin_email: Option<String>,
    pub connection_string: Option<String>,
    pub valid_until: DateTime<Utc>,
    pub is_active: bool,
}

/// Tenant store operations plus provisioning orchestration.
pub struct TenantService<T, R, C, U>
where
    T: TenantRepository,
    R: RoleRepository,
    C: RoleClaimRepository,
    U: UserRepository,
{
    tenant_repo: T,
    seeder: TenantSeeder<R, C, U>,
}

impl<T, R, C, U> TenantService<T, R, C, U>
where
    T: TenantRepository,
    R: RoleRepository,
    C: RoleClaimRepository,
    U: UserRepository,
{
    pub fn new(tenant_repo: T, seeder: TenantSeeder<R, C, U>) -> Self {
        Self {
            tenant_repo,
            seeder,
        }
    }

    /// Create a tenant and provision its roles, permissions and admin
    /// user. A failed provisioning removes the half-created tenant
    /// record again.
    pub async fn create_tenant(&self, input: CreateTenantInput) -> CampusResult<Tenant> {
        let tenant = self
            .tenant_repo
            .create(CreateTenant {
                id: input.identifier.clone(),
                identifier: input.identifier,
                name: input.name,
                admin_email: input.admin_email,
                connection_string: input.connection_string,
                valid_until: input.valid_until,
                is_active: input.is_active,
            })
            .await?;

        if let Err(e) = self.seeder.seed(&tenant).await {
            let _ = self.tenant_repo.delete(&tenant.id).await;
            return Err(e);
        }

        Ok(tenant)
    }

    pub async fn activate(&self, id: &str) -> CampusResult<Tenant> {
        self.tenant_repo
            .update(
                id,
                UpdateTenant {
                    is_active: Some(true),
                    ..Default::default()
                },
            )
            .await
    }

    pub async fn deactivate(&self, id: &str) -> CampusResult<Tenant> {
        self.tenant_repo
            .update(
                id,
                UpdateTenant {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
    }

    pub async fn update_subscription(
        &self,
        id: &str,
        valid_until: DateTime<Utc>,
    ) -> CampusResult<Tenant> {
        self.tenant_repo
            .update(
                id,
                UpdateTenant {
                    valid_until: Some(valid_until),
                    ..Default::default()
                },
            )
            .await
    }

    pub async fn get_tenant(&self, id: &str) -> CampusResult<Tenant> {
        self.tenant_repo.get_by_id(id).await
    }

    pub async fn list_tenants(&self) -> CampusResult<Vec<Tenant>> {
        self.tenant_repo.list().await
    }

    /// Ensure the distinguished root tenant record exists. Created
    /// once with a 1-year validity window; later calls return the
    /// existing record untouched.
    pub async fn ensure_root_tenant(&self) -> CampusResult<Tenant> {
        match self.tenant_repo.get_by_id(tenancy::root::ID).await {
            Ok(tenant) => Ok(tenant),
            Err(CampusError::NotFound { .. }) => {
                self.tenant_repo
                    .create(CreateTenant {
                        id: tenancy::root::ID.to_string(),
                        identifier: tenancy::root::NAME.to_string(),
                        name: tenancy::root::NAME.to_string(),
                        admin_email: Some(tenancy::root::ADMIN_EMAIL.to_string()),
                        connection_string: None,
                        valid_until: Utc::now() + Duration::days(365),
                        is_active: true,
                    })
                    .await
            }
            Err(e) => Err(e),
        }
    }

    /// Bootstrap: ensure the root tenant, then (re-)seed every known
    /// tenant. Safe to run on every startup.
    pub async fn initialize(&self) -> CampusResult<()> {
        self.ensure_root_tenant().await?;

        for tenant in self.tenant_repo.list().await? {
            self.seeder.seed(&tenant).await?;
        }

        Ok(())
    }
}
