//! Permission catalog.
//!
//! The catalog is fixed at compile time and never persisted. A
//! permission is identified by its name, `Permission.<Feature>.<Action>`;
//! role claims store these names as claim values.

use serde::{Deserialize, Serialize};

/// Claim type under which permission grants are stored on roles.
pub const CLAIM_TYPE: &str = "Permission";

const NAME_PREFIX: &str = "Permission";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    View,
    Create,
    Update,
    Delete,
    UpgradeSubscription,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "View",
            Action::Create => "Create",
            Action::Update => "Update",
            Action::Delete => "Delete",
            Action::UpgradeSubscription => "UpgradeSubscription",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "View" => Some(Action::View),
            "Create" => Some(Action::Create),
            "Update" => Some(Action::Update),
            "Delete" => Some(Action::Delete),
            "UpgradeSubscription" => Some(Action::UpgradeSubscription),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feature {
    Tenants,
    Users,
    UserRoles,
    Roles,
    RoleClaims,
    Schools,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Tenants => "Tenants",
            Feature::Users => "Users",
            Feature::UserRoles => "UserRoles",
            Feature::Roles => "Roles",
            Feature::RoleClaims => "RoleClaims",
            Feature::Schools => "Schools",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Tenants" => Some(Feature::Tenants),
            "Users" => Some(Feature::Users),
            "UserRoles" => Some(Feature::UserRoles),
            "Roles" => Some(Feature::Roles),
            "RoleClaims" => Some(Feature::RoleClaims),
            "Schools" => Some(Feature::Schools),
            _ => None,
        }
    }
}

/// A single catalog entry. `is_root` entries are grantable only within
/// the root tenant; `is_basic` entries form the Basic role tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permission {
    pub description: &'static str,
    pub action: Action,
    pub feature: Feature,
    pub is_basic: bool,
    pub is_root: bool,
}

impl Permission {
    pub fn name(&self) -> String {
        name_for(self.action, self.feature)
    }
}

/// `Permission.<Feature>.<Action>`
pub fn name_for(action: Action, feature: Feature) -> String {
    format!("{NAME_PREFIX}.{}.{}", feature.as_str(), action.as_str())
}

/// Parse a permission name back into its (action, feature) pair.
pub fn parse_name(name: &str) -> Option<(Action, Feature)> {
    let mut parts = name.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(NAME_PREFIX), Some(feature), Some(action), None) => {
            Some((Action::parse(action)?, Feature::parse(feature)?))
        }
        _ => None,
    }
}

const fn perm(description: &'static str, action: Action, feature: Feature) -> Permission {
    Permission {
        description,
        action,
        feature,
        is_basic: false,
        is_root: false,
    }
}

const fn basic_perm(description: &'static str, action: Action, feature: Feature) -> Permission {
    Permission {
        description,
        action,
        feature,
        is_basic: true,
        is_root: false,
    }
}

const fn root_perm(description: &'static str, action: Action, feature: Feature) -> Permission {
    Permission {
        description,
        action,
        feature,
        is_basic: false,
        is_root: true,
    }
}

static CATALOG: &[Permission] = &[
    perm("View Users", Action::View, Feature::Users),
    perm("Create Users", Action::Create, Feature::Users),
    perm("Update Users", Action::Update, Feature::Users),
    perm("Delete Users", Action::Delete, Feature::Users),
    perm("View User Roles", Action::View, Feature::UserRoles),
    perm("Update User Roles", Action::Update, Feature::UserRoles),
    perm("View Roles", Action::View, Feature::Roles),
    perm("Create Roles", Action::Create, Feature::Roles),
    perm("Update Roles", Action::Update, Feature::Roles),
    perm("Delete Roles", Action::Delete, Feature::Roles),
    perm("View Role Claims/Permissions", Action::View, Feature::RoleClaims),
    perm("Update Role Claims/Permissions", Action::Update, Feature::RoleClaims),
    basic_perm("View Schools", Action::View, Feature::Schools),
    perm("Create Schools", Action::Create, Feature::Schools),
    perm("Update Schools", Action::Update, Feature::Schools),
    perm("Delete Schools", Action::Delete, Feature::Schools),
    root_perm("View Tenants", Action::View, Feature::Tenants),
    root_perm("Create Tenants", Action::Create, Feature::Tenants),
    root_perm("Update Tenants", Action::Update, Feature::Tenants),
    root_perm(
        "Upgrade Tenants Subscription",
        Action::UpgradeSubscription,
        Feature::Tenants,
    ),
];

/// Every permission in the catalog.
pub fn all() -> &'static [Permission] {
    CATALOG
}

/// Permissions grantable only within the root tenant.
pub fn root() -> Vec<Permission> {
    CATALOG.iter().filter(|p| p.is_root).copied().collect()
}

/// The Admin tier: everything except root-only permissions.
pub fn admin() -> Vec<Permission> {
    CATALOG.iter().filter(|p| !p.is_root).copied().collect()
}

/// The Basic tier.
pub fn basic() -> Vec<Permission> {
    CATALOG.iter().filter(|p| p.is_basic).copied().collect()
}

/// Resolve a permission name against the catalog.
pub fn find(name: &str) -> Option<&'static Permission> {
    CATALOG.iter().find(|p| p.name() == name)
}

/// Whether `name` is reserved for the root tenant, either by catalog
/// flag or by living under the Tenants feature namespace.
pub fn is_root_name(name: &str) -> bool {
    find(name).is_some_and(|p| p.is_root)
        || name.to_ascii_lowercase().starts_with("permission.tenants.")
}
