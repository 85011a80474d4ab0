//! User-role assignment and authorization evaluation.

use std::collections::{BTreeSet, HashSet};

use campus_core::error::{CampusError, CampusResult};
use campus_core::permissions;
use campus_core::repository::{
    PaginatedResult, Pagination, RoleClaimRepository, RoleRepository, UserRepository,
};
use campus_core::{roles, tenancy};
use futures::future::join_all;
use uuid::Uuid;

/// One requested membership change.
#[derive(Debug, Clone)]
pub struct UserRoleChange {
    pub role_id: Uuid,
    pub name: String,
    pub is_assigned: bool,
}

/// A tenant role flagged with the user's membership.
#[derive(Debug, Clone)]
pub struct UserRoleFlag {
    pub role_id: Uuid,
    pub name: String,
    pub description: String,
    pub is_assigned: bool,
}

/// User-facing role and permission operations.
pub struct UserService<R, C, U>
where
    R: RoleRepository,
    C: RoleClaimRepository,
    U: UserRepository,
{
    role_repo: R,
    claim_repo: C,
    user_repo: U,
}

impl<R, C, U> UserService<R, C, U>
where
    R: RoleRepository,
    C: RoleClaimRepository,
    U: UserRepository,
{
    pub fn new(role_repo: R, claim_repo: C, user_repo: U) -> Self {
        Self {
            role_repo,
            claim_repo,
            user_repo,
        }
    }

    /// The union of permission claims over the user's roles,
    /// deduplicated.
    pub async fn permissions_for(
        &self,
        tenant_id: &str,
        user_id: Uuid,
    ) -> CampusResult<Vec<String>> {
        self.user_repo.get_by_id(tenant_id, user_id).await?;

        let user_roles = self.role_repo.get_user_roles(tenant_id, user_id).await?;

        let mut names = BTreeSet::new();
        for role in &user_roles {
            for claim in self.claim_repo.list_for_role(tenant_id, role.id).await? {
                if claim.claim_type == permissions::CLAIM_TYPE {
                    names.insert(claim.claim_value);
                }
            }
        }

        Ok(names.into_iter().collect())
    }

    /// Whether the user currently holds `permission`.
    ///
    /// Never errors: a missing user, an inactive user, and a missing
    /// claim all evaluate to deny. Callers that need to distinguish
    /// "unauthenticated" must check authentication state beforehand.
    pub async fn has_permission(&self, tenant_id: &str, user_id: Uuid, permission: &str) -> bool {
        let Ok(user) = self.user_repo.get_by_id(tenant_id, user_id).await else {
            return false;
        };
        if !user.is_active {
            return false;
        }

        match self.permissions_for(tenant_id, user_id).await {
            Ok(names) => names.iter().any(|n| n == permission),
            Err(_) => false,
        }
    }

    /// Policy-layer helper: deny becomes a Forbidden error.
    pub async fn require_permission(
        &self,
        tenant_id: &str,
        user_id: Uuid,
        permission: &str,
    ) -> CampusResult<()> {
        if self.has_permission(tenant_id, user_id, permission).await {
            Ok(())
        } else {
            Err(CampusError::Forbidden {
                permission: permission.to_string(),
            })
        }
    }

    /// Every role in the tenant, flagged with the user's membership.
    pub async fn user_roles(
        &self,
        tenant_id: &str,
        user_id: Uuid,
        pagination: Pagination,
    ) -> CampusResult<PaginatedResult<UserRoleFlag>> {
        self.user_repo.get_by_id(tenant_id, user_id).await?;

        let assigned: HashSet<Uuid> = self
            .role_repo
            .get_user_roles(tenant_id, user_id)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();

        let page = self.role_repo.list(tenant_id, pagination).await?;

        Ok(PaginatedResult {
            items: page
                .items
                .into_iter()
                .map(|role| UserRoleFlag {
                    role_id: role.id,
                    is_assigned: assigned.contains(&role.id),
                    name: role.name,
                    description: role.description,
                })
                .collect(),
            total: page.total,
            offset: page.offset,
            limit: page.limit,
        })
    }

    /// Apply a batch of role membership changes for one user.
    ///
    /// Guards run against the pre-mutation state and reject the whole
    /// batch on violation: the root tenant's root admin can never lose
    /// the Admin role, and a tenant removing an Admin membership must
    /// currently have more than 2 admins. Entries referencing roles
    /// that do not exist are skipped; the net changes apply as one
    /// transaction.
    pub async fn assign_roles(
        &self,
        tenant_id: &str,
        user_id: Uuid,
        changes: Vec<UserRoleChange>,
    ) -> CampusResult<()> {
        let user = self.user_repo.get_by_id(tenant_id, user_id).await?;

        let removing_admin = changes
            .iter()
            .any(|c| !c.is_assigned && c.name == roles::ADMIN);

        if removing_admin {
            let admin_role = self.role_repo.get_by_name(tenant_id, roles::ADMIN).await?;

            if self
                .role_repo
                .is_member(tenant_id, user_id, admin_role.id)
                .await?
            {
                let is_root_admin = tenancy::is_root(tenant_id)
                    && user.email.eq_ignore_ascii_case(tenancy::root::ADMIN_EMAIL);
                if is_root_admin {
                    return Err(CampusError::Conflict {
                        message: "not allowed to remove the Admin role from the root tenant admin"
                            .into(),
                    });
                }

                let admin_count = self
                    .role_repo
                    .count_members(tenant_id, admin_role.id)
                    .await?;
                if admin_count <= 2 {
                    return Err(CampusError::Conflict {
                        message: "tenant must keep at least 2 admin users".into(),
                    });
                }
            }
        }

        // Role existence checks are independent and read-only, so they
        // run concurrently.
        let lookups = join_all(
            changes
                .iter()
                .map(|c| self.role_repo.get_by_id(tenant_id, c.role_id)),
        )
        .await;

        let mut assign = Vec::new();
        let mut unassign = Vec::new();
        for (change, lookup) in changes.iter().zip(lookups) {
            let role = match lookup {
                Ok(role) => role,
                // Entries referencing unknown roles are skipped.
                Err(CampusError::NotFound { .. }) => continue,
                Err(e) => return Err(e),
            };

            let member = self
                .role_repo
                .is_member(tenant_id, user_id, role.id)
                .await?;

            if change.is_assigned && !member {
                assign.push(role.id);
            } else if !change.is_assigned && member {
                unassign.push(role.id);
            }
        }

        if assign.is_empty() && unassign.is_empty() {
            return Ok(());
        }

        self.role_repo
            .apply_membership(tenant_id, user_id, assign, unassign)
            .await
    }
}
