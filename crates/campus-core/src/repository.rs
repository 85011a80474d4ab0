//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Tenant-scoped repositories
//! require a `tenant_id` parameter to enforce data isolation — there is
//! no ambient tenant context.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::CampusResult;
use crate::models::{
    role::{CreateRole, Role, UpdateRole},
    role_claim::RoleClaim,
    tenant::{CreateTenant, Tenant, UpdateTenant},
    user::{CreateUser, UpdateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Tenants (global scope)
// ---------------------------------------------------------------------------

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = CampusResult<Tenant>> + Send;
    fn get_by_id(&self, id: &str) -> impl Future<Output = CampusResult<Tenant>> + Send;
    fn update(
        &self,
        id: &str,
        input: UpdateTenant,
    ) -> impl Future<Output = CampusResult<Tenant>> + Send;
    /// Hard removal; only used to roll back a failed tenant creation.
    fn delete(&self, id: &str) -> impl Future<Output = CampusResult<()>> + Send;
    fn list(&self) -> impl Future<Output = CampusResult<Vec<Tenant>>> + Send;
}

// ---------------------------------------------------------------------------
// Tenant-scoped repositories
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = CampusResult<User>> + Send;
    fn get_by_id(
        &self,
        tenant_id: &str,
        id: Uuid,
    ) -> impl Future<Output = CampusResult<User>> + Send;
    fn get_by_email(
        &self,
        tenant_id: &str,
        email: &str,
    ) -> impl Future<Output = CampusResult<User>> + Send;
    fn update(
        &self,
        tenant_id: &str,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = CampusResult<User>> + Send;
    /// Overwrite the stored refresh token and its expiry. A user holds
    /// at most one active refresh token.
    fn set_refresh_token(
        &self,
        tenant_id: &str,
        id: Uuid,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> impl Future<Output = CampusResult<()>> + Send;
    fn list(
        &self,
        tenant_id: &str,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<User>>> + Send;
}

pub trait RoleRepository: Send + Sync {
    fn create(&self, input: CreateRole) -> impl Future<Output = CampusResult<Role>> + Send;
    fn get_by_id(
        &self,
        tenant_id: &str,
        id: Uuid,
    ) -> impl Future<Output = CampusResult<Role>> + Send;
    /// Case-insensitive name lookup within the tenant.
    fn get_by_name(
        &self,
        tenant_id: &str,
        name: &str,
    ) -> impl Future<Output = CampusResult<Role>> + Send;
    fn update(
        &self,
        tenant_id: &str,
        id: Uuid,
        input: UpdateRole,
    ) -> impl Future<Output = CampusResult<Role>> + Send;
    fn delete(&self, tenant_id: &str, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
    fn list(
        &self,
        tenant_id: &str,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Role>>> + Send;

    fn assign_to_user(
        &self,
        tenant_id: &str,
        user_id: Uuid,
        role_id: Uuid,
    ) -> impl Future<Output = CampusResult<()>> + Send;

    fn unassign_from_user(
        &self,
        tenant_id: &str,
        user_id: Uuid,
        role_id: Uuid,
    ) -> impl Future<Output = CampusResult<()>> + Send;

    /// Apply a batch of membership changes for one user in a single
    /// transaction: the batch fully applies or fully rejects.
    fn apply_membership(
        &self,
        tenant_id: &str,
        user_id: Uuid,
        assign: Vec<Uuid>,
        unassign: Vec<Uuid>,
    ) -> impl Future<Output = CampusResult<()>> + Send;

    fn get_user_roles(
        &self,
        tenant_id: &str,
        user_id: Uuid,
    ) -> impl Future<Output = CampusResult<Vec<Role>>> + Send;

    fn is_member(
        &self,
        tenant_id: &str,
        user_id: Uuid,
        role_id: Uuid,
    ) -> impl Future<Output = CampusResult<bool>> + Send;

    fn count_members(
        &self,
        tenant_id: &str,
        role_id: Uuid,
    ) -> impl Future<Output = CampusResult<u64>> + Send;
}

pub trait RoleClaimRepository: Send + Sync {
    fn list_for_role(
        &self,
        tenant_id: &str,
        role_id: Uuid,
    ) -> impl Future<Output = CampusResult<Vec<RoleClaim>>> + Send;

    /// Apply a claim diff for one role in a single transaction: every
    /// add and remove lands, or none do.
    fn apply_diff(
        &self,
        tenant_id: &str,
        role_id: Uuid,
        claim_type: &str,
        add: Vec<String>,
        remove: Vec<String>,
    ) -> impl Future<Output = CampusResult<()>> + Send;
}
