//! Tenant domain model.
//!
//! A tenant is an isolated school/organization scope. All users, roles
//! and role claims are partitioned per tenant; only the distinguished
//! root tenant spans the platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tenancy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    /// Caller-chosen identifier, also the record id (root tenant: `root`).
    pub id: String,
    pub identifier: String,
    pub name: String,
    /// Email of the tenant admin seeded at provisioning time, if any.
    pub admin_email: Option<String>,
    pub connection_string: Option<String>,
    /// Subscription expiry. Ignored for the root tenant.
    pub valid_until: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    pub fn is_root(&self) -> bool {
        tenancy::is_root(&self.id)
    }

    /// Whether the tenant subscription is live at `now`. The root
    /// tenant never expires.
    pub fn subscription_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.is_root() || self.valid_until >= now
    }
}

/// Fields required to create a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub id: String,
    pub identifier: String,
    pub name: String,
    pub admin_email: Option<String>,
    pub connection_string: Option<String>,
    pub valid_until: DateTime<Utc>,
    pub is_active: bool,
}

/// Fields that can be updated on an existing tenant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTenant {
    pub is_active: Option<bool>,
    pub valid_until: Option<DateTime<Utc>>,
}
