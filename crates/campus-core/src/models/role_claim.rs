//! Role claim domain model.
//!
//! A permission is granted to a role by a claim of type `Permission`
//! whose value is a permission name from the catalog.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleClaim {
    pub role_id: Uuid,
    pub claim_type: String,
    pub claim_value: String,
}
