//! Role management — CRUD with reserved-role invariants and
//! permission-claim updates.

use std::collections::BTreeSet;

use campus_core::error::{CampusError, CampusResult};
use campus_core::models::role::{CreateRole, Role, UpdateRole};
use campus_core::permissions;
use campus_core::repository::{
    PaginatedResult, Pagination, RoleClaimRepository, RoleRepository,
};
use campus_core::{roles, tenancy};
use uuid::Uuid;

/// A role together with its granted permission names.
#[derive(Debug, Clone)]
pub struct RoleWithPermissions {
    pub role: Role,
    pub permissions: Vec<String>,
}

/// Outcome of a permission update: the claims that were actually
/// added and removed. Both empty when the request converged already.
#[derive(Debug, Clone, Default)]
pub struct PermissionUpdate {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// Role & permission store operations.
///
/// Generic over repository implementations so the service layer has no
/// dependency on the database crate.
pub struct RoleService<R: RoleRepository, C: RoleClaimRepository> {
    role_repo: R,
    claim_repo: C,
}

impl<R: RoleRepository, C: RoleClaimRepository> RoleService<R, C> {
    pub fn new(role_repo: R, claim_repo: C) -> Self {
        Self {
            role_repo,
            claim_repo,
        }
    }

    /// Create a role. Fails with Conflict if a role with the same name
    /// (case-insensitive) already exists in the tenant.
    pub async fn create_role(
        &self,
        tenant_id: &str,
        name: String,
        description: String,
    ) -> CampusResult<Role> {
        match self.role_repo.get_by_name(tenant_id, &name).await {
            Ok(existing) => Err(CampusError::Conflict {
                message: format!("role {} already exists", existing.name),
            }),
            Err(CampusError::NotFound { .. }) => {
                self.role_repo
                    .create(CreateRole {
                        tenant_id: tenant_id.to_string(),
                        name,
                        description,
                    })
                    .await
            }
            Err(e) => Err(e),
        }
    }

    /// Rename or re-describe a role. Default roles are immutable.
    pub async fn update_role(
        &self,
        tenant_id: &str,
        id: Uuid,
        name: String,
        description: String,
    ) -> CampusResult<Role> {
        let role = self.role_repo.get_by_id(tenant_id, id).await?;

        if roles::is_default(&role.name) {
            return Err(CampusError::Conflict {
                message: format!("changes not allowed on {} role", role.name),
            });
        }

        self.role_repo
            .update(
                tenant_id,
                id,
                UpdateRole {
                    name: Some(name),
                    description: Some(description),
                },
            )
            .await
    }

    /// Delete a role. Default roles and roles still assigned to users
    /// cannot be deleted.
    pub async fn delete_role(&self, tenant_id: &str, id: Uuid) -> CampusResult<()> {
        let role = self.role_repo.get_by_id(tenant_id, id).await?;

        if roles::is_default(&role.name) {
            return Err(CampusError::Conflict {
                message: format!("not allowed to delete {} role", role.name),
            });
        }

        if self.role_repo.count_members(tenant_id, id).await? > 0 {
            return Err(CampusError::Conflict {
                message: format!(
                    "not allowed to delete {} role as it is already in use",
                    role.name
                ),
            });
        }

        self.role_repo.delete(tenant_id, id).await
    }

    /// Replace a role's permission set with `requested`.
    ///
    /// The Admin role's permissions are fixed. Outside the root tenant,
    /// root-only permission names are silently stripped before diffing.
    /// Names the catalog does not know are rejected in aggregate. The
    /// surviving diff (symmetric difference against current claims)
    /// applies as one transaction; claims present on both sides are
    /// left untouched, so repeating a request is a no-op.
    pub async fn update_permissions(
        &self,
        tenant_id: &str,
        role_id: Uuid,
        requested: Vec<String>,
    ) -> CampusResult<PermissionUpdate> {
        let role = self.role_repo.get_by_id(tenant_id, role_id).await?;

        if role.name.eq_ignore_ascii_case(roles::ADMIN) {
            return Err(CampusError::Conflict {
                message: "not allowed to change permissions of the Admin role".into(),
            });
        }

        let mut requested: BTreeSet<String> = requested.into_iter().collect();

        if !tenancy::is_root(tenant_id) {
            requested.retain(|name| !permissions::is_root_name(name));
        }

        let unknown: Vec<String> = requested
            .iter()
            .filter(|name| permissions::find(name).is_none())
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(CampusError::OperationFailed {
                message: "failed to update role permissions, unknown permissions".into(),
                errors: unknown,
            });
        }

        let current: BTreeSet<String> = self
            .claim_repo
            .list_for_role(tenant_id, role_id)
            .await?
            .into_iter()
            .filter(|c| c.claim_type == permissions::CLAIM_TYPE)
            .map(|c| c.claim_value)
            .collect();

        let added: Vec<String> = requested.difference(&current).cloned().collect();
        let removed: Vec<String> = current.difference(&requested).cloned().collect();

        if !added.is_empty() || !removed.is_empty() {
            self.claim_repo
                .apply_diff(
                    tenant_id,
                    role_id,
                    permissions::CLAIM_TYPE,
                    added.clone(),
                    removed.clone(),
                )
                .await?;
        }

        Ok(PermissionUpdate { added, removed })
    }

    pub async fn get_roles(
        &self,
        tenant_id: &str,
        pagination: Pagination,
    ) -> CampusResult<PaginatedResult<Role>> {
        self.role_repo.list(tenant_id, pagination).await
    }

    pub async fn get_role_by_id(&self, tenant_id: &str, id: Uuid) -> CampusResult<Role> {
        self.role_repo.get_by_id(tenant_id, id).await
    }

    pub async fn get_role_with_permissions(
        &self,
        tenant_id: &str,
        id: Uuid,
    ) -> CampusResult<RoleWithPermissions> {
        let role = self.role_repo.get_by_id(tenant_id, id).await?;
        let granted = self
            .claim_repo
            .list_for_role(tenant_id, id)
            .await?
            .into_iter()
            .filter(|c| c.claim_type == permissions::CLAIM_TYPE)
            .map(|c| c.claim_value)
            .collect();

        Ok(RoleWithPermissions {
            role,
            permissions: granted,
        })
    }

    pub async fn role_exists(&self, tenant_id: &str, name: &str) -> CampusResult<bool> {
        match self.role_repo.get_by_name(tenant_id, name).await {
            Ok(_) => Ok(true),
            Err(CampusError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
