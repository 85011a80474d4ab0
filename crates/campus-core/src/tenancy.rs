//! Tenancy constants.
//!
//! Tenant ids are caller-chosen strings; the platform-operator tenant is
//! the distinguished `root` tenant, which is exempt from subscription
//! expiry.

/// Request header carrying the tenant identifier.
pub const TENANT_HEADER: &str = "tenant";

/// The distinguished root tenant.
pub mod root {
    pub const ID: &str = "root";
    pub const NAME: &str = "Root";
    pub const ADMIN_EMAIL: &str = "admin.root@school.com";
}

/// Whether `tenant_id` is the root tenant.
pub fn is_root(tenant_id: &str) -> bool {
    tenant_id == root::ID
}
