//! Reserved role names.
//!
//! Every tenant is provisioned with the default roles; they cannot be
//! renamed or deleted.

pub const ADMIN: &str = "Admin";
pub const BASIC: &str = "Basic";

pub const DEFAULT_ROLES: [&str; 2] = [ADMIN, BASIC];

/// Whether `name` refers to a reserved default role.
pub fn is_default(name: &str) -> bool {
    DEFAULT_ROLES.iter().any(|r| r.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roles_are_reserved() {
        assert!(is_default("Admin"));
        assert!(is_default("basic"));
        assert!(!is_default("Teacher"));
    }
}
