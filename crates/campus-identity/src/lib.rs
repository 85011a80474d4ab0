//! Campus Identity — role & permission management, user-role
//! assignment, authorization evaluation, and tenant provisioning.

pub mod provisioning;
pub mod roles;
pub mod tenants;
pub mod users;

pub use provisioning::{SeedConfig, TenantSeeder};
pub use roles::{PermissionUpdate, RoleService, RoleWithPermissions};
pub use tenants::{CreateTenantInput, TenantService};
pub use users::{UserRoleChange, UserRoleFlag, UserService};
