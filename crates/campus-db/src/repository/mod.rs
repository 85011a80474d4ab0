//! SurrealDB repository implementations.

mod role;
mod role_claim;
mod tenant;
mod user;

pub use role::SurrealRoleRepository;
pub use role_claim::SurrealRoleClaimRepository;
pub use tenant::SurrealTenantRepository;
pub use user::{SurrealUserRepository, verify_password};
