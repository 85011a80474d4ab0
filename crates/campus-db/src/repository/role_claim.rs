//! SurrealDB implementation of [`RoleClaimRepository`].

use campus_core::error::CampusResult;
use campus_core::models::role_claim::RoleClaim;
use campus_core::repository::RoleClaimRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RoleClaimRow {
    role_id: String,
    claim_type: String,
    claim_value: String,
}

impl RoleClaimRow {
    fn try_into_claim(self) -> Result<RoleClaim, DbError> {
        let role_id = Uuid::parse_str(&self.role_id)
            .map_err(|e| DbError::Migration(format!("invalid role UUID: {e}")))?;
        Ok(RoleClaim {
            role_id,
            claim_type: self.claim_type,
            claim_value: self.claim_value,
        })
    }
}

/// SurrealDB implementation of the RoleClaim repository.
#[derive(Clone)]
pub struct SurrealRoleClaimRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRoleClaimRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RoleClaimRepository for SurrealRoleClaimRepository<C> {
    async fn list_for_role(&self, tenant_id: &str, role_id: Uuid) -> CampusResult<Vec<RoleClaim>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM role_claim \
                 WHERE tenant_id = $tenant_id AND role_id = $role_id",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("role_id", role_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleClaimRow> = result.take(0).map_err(DbError::from)?;

        let claims = rows
            .into_iter()
            .map(|row| row.try_into_claim())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(claims)
    }

    async fn apply_diff(
        &self,
        tenant_id: &str,
        role_id: Uuid,
        claim_type: &str,
        add: Vec<String>,
        remove: Vec<String>,
    ) -> CampusResult<()> {
        if add.is_empty() && remove.is_empty() {
            return Ok(());
        }

        // One transaction: the whole diff lands, or none of it does.
        self.db
            .query(
                "BEGIN TRANSACTION; \
                 FOR $value IN $add { \
                     CREATE role_claim SET \
                     tenant_id = $tenant_id, role_id = $role_id, \
                     claim_type = $claim_type, claim_value = $value; \
                 }; \
                 FOR $value IN $remove { \
                     DELETE role_claim WHERE \
                     tenant_id = $tenant_id AND role_id = $role_id AND \
                     claim_type = $claim_type AND claim_value = $value; \
                 }; \
                 COMMIT TRANSACTION;",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("role_id", role_id.to_string()))
            .bind(("claim_type", claim_type.to_string()))
            .bind(("add", add))
            .bind(("remove", remove))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        Ok(())
    }
}
