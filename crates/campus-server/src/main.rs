//! Campus Server — Application entry point.

use campus_db::repository::{
    SurrealRoleClaimRepository, SurrealRoleRepository, SurrealTenantRepository,
    SurrealUserRepository,
};
use campus_db::{DbConfig, DbManager};
use campus_identity::{SeedConfig, TenantSeeder, TenantService};
use tracing_subscriber::EnvFilter;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("campus=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Campus server...");

    let db_config = DbConfig {
        url: env_or("CAMPUS_DB_URL", "127.0.0.1:8000"),
        namespace: env_or("CAMPUS_DB_NAMESPACE", "campus"),
        database: env_or("CAMPUS_DB_NAME", "main"),
        username: env_or("CAMPUS_DB_USER", "root"),
        password: env_or("CAMPUS_DB_PASSWORD", "root"),
    };

    let manager = match DbManager::connect(&db_config).await {
        Ok(manager) => manager,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to SurrealDB");
            return;
        }
    };

    if let Err(e) = campus_db::run_migrations(manager.client()).await {
        tracing::error!(error = %e, "Failed to run migrations");
        return;
    }

    // The seed password has no default on purpose.
    let Ok(seed_password) = std::env::var("CAMPUS_SEED_PASSWORD") else {
        tracing::error!("CAMPUS_SEED_PASSWORD is not set; refusing to seed tenants");
        return;
    };

    let db = manager.client().clone();
    let seeder = TenantSeeder::new(
        SurrealRoleRepository::new(db.clone()),
        SurrealRoleClaimRepository::new(db.clone()),
        SurrealUserRepository::new(db.clone()),
        SeedConfig {
            default_password: seed_password,
            admin_first_name: env_or("CAMPUS_ADMIN_FIRST_NAME", "Campus"),
            admin_last_name: env_or("CAMPUS_ADMIN_LAST_NAME", "Admin"),
        },
    );
    let tenant_service = TenantService::new(SurrealTenantRepository::new(db), seeder);

    if let Err(e) = tenant_service.initialize().await {
        tracing::error!(error = %e, "Failed to initialize tenants");
        return;
    }

    tracing::info!("Tenant store initialized");

    // TODO: start REST API server

    tracing::info!("Campus server stopped.");
}
