//! SurrealDB implementation of [`TenantRepository`].

use campus_core::error::CampusResult;
use campus_core::models::tenant::{CreateTenant, Tenant, UpdateTenant};
use campus_core::repository::TenantRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

/// DB-side row struct for queries where the record id is already known.
#[derive(Debug, SurrealValue)]
struct TenantRow {
    identifier: String,
    name: String,
    admin_email: Option<String>,
    connection_string: Option<String>,
    valid_until: DateTime<Utc>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn into_tenant(self, id: String) -> Tenant {
        Tenant {
            id,
            identifier: self.identifier,
            name: self.name,
            admin_email: self.admin_email,
            connection_string: self.connection_string,
            valid_until: self.valid_until,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// DB-side row struct that includes the record id via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TenantRowWithId {
    record_id: String,
    identifier: String,
    name: String,
    admin_email: Option<String>,
    connection_string: Option<String>,
    valid_until: DateTime<Utc>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRowWithId {
    fn into_tenant(self) -> Tenant {
        Tenant {
            id: self.record_id,
            identifier: self.identifier,
            name: self.name,
            admin_email: self.admin_email,
            connection_string: self.connection_string,
            valid_until: self.valid_until,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// SurrealDB implementation of the Tenant repository.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn create(&self, input: CreateTenant) -> CampusResult<Tenant> {
        let id = input.id.clone();

        let result = self
            .db
            .query(
                "CREATE type::record('tenant', $id) SET \
                 identifier = $identifier, \
                 name = $name, \
                 admin_email = $admin_email, \
                 connection_string = $connection_string, \
                 valid_until = $valid_until, \
                 is_active = $is_active",
            )
            .bind(("id", id.clone()))
            .bind(("identifier", input.identifier))
            .bind(("name", input.name))
            .bind(("admin_email", input.admin_email))
            .bind(("connection_string", input.connection_string))
            .bind(("valid_until", input.valid_until))
            .bind(("is_active", input.is_active))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id.clone(),
        })?;

        Ok(row.into_tenant(id))
    }

    async fn get_by_id(&self, id: &str) -> CampusResult<Tenant> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('tenant', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str.clone(),
        })?;

        Ok(row.into_tenant(id_str))
    }

    async fn update(&self, id: &str, input: UpdateTenant) -> CampusResult<Tenant> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }
        if input.valid_until.is_some() {
            sets.push("valid_until = $valid_until");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('tenant', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(is_active) = input.is_active {
            builder = builder.bind(("is_active", is_active));
        }
        if let Some(valid_until) = input.valid_until {
            builder = builder.bind(("valid_until", valid_until));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str.clone(),
        })?;

        Ok(row.into_tenant(id_str))
    }

    async fn delete(&self, id: &str) -> CampusResult<()> {
        self.db
            .query("DELETE type::record('tenant', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self) -> CampusResult<Vec<Tenant>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM tenant \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows.into_iter().map(|row| row.into_tenant()).collect())
    }
}
