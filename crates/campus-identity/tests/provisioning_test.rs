//! Integration tests for tenant provisioning and lifecycle using
//! in-memory SurrealDB.

use std::collections::BTreeSet;

use campus_auth::config::AuthConfig;
use campus_auth::service::{LoginInput, TokenService};
use campus_core::error::CampusError;
use campus_core::repository::{
    RoleClaimRepository, RoleRepository, TenantRepository, UserRepository,
};
use campus_core::{permissions, roles, tenancy};
use campus_db::repository::{
    SurrealRoleClaimRepository, SurrealRoleRepository, SurrealTenantRepository,
    SurrealUserRepository,
};
use campus_identity::{CreateTenantInput, SeedConfig, TenantSeeder, TenantService};
use chrono::{Duration, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;

struct Fixture {
    svc: TenantService<
        SurrealTenantRepository<Db>,
        SurrealRoleRepository<Db>,
        SurrealRoleClaimRepository<Db>,
        SurrealUserRepository<Db>,
    >,
    tenant_repo: SurrealTenantRepository<Db>,
    role_repo: SurrealRoleRepository<Db>,
    claim_repo: SurrealRoleClaimRepository<Db>,
    user_repo: SurrealUserRepository<Db>,
    db: Surreal<Db>,
}

fn seed_config() -> SeedConfig {
    SeedConfig {
        default_password: "seed-me-once".into(),
        admin_first_name: "Campus".into(),
        admin_last_name: "Admin".into(),
    }
}

async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    campus_db::run_migrations(&db).await.unwrap();

    let seeder = TenantSeeder::new(
        SurrealRoleRepository::new(db.clone()),
        SurrealRoleClaimRepository::new(db.clone()),
        SurrealUserRepository::new(db.clone()),
        seed_config(),
    );

    Fixture {
        svc: TenantService::new(SurrealTenantRepository::new(db.clone()), seeder),
        tenant_repo: SurrealTenantRepository::new(db.clone()),
        role_repo: SurrealRoleRepository::new(db.clone()),
        claim_repo: SurrealRoleClaimRepository::new(db.clone()),
        user_repo: SurrealUserRepository::new(db.clone()),
        db,
    }
}

fn school(identifier: &str) -> CreateTenantInput {
    CreateTenantInput {
        identifier: identifier.to_string(),
        name: format!("{identifier} school"),
        admin_email: Some(format!("admin@{identifier}.com")),
        connection_string: None,
        valid_until: Utc::now() + Duration::days(30),
        is_active: true,
    }
}

async fn claim_set(fx: &Fixture, tenant: &str, role_id: Uuid) -> BTreeSet<String> {
    fx.claim_repo
        .list_for_role(tenant, role_id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.claim_value)
        .collect()
}

fn names(perms: &[permissions::Permission]) -> BTreeSet<String> {
    perms.iter().map(|p| p.name()).collect()
}

#[tokio::test]
async fn create_tenant_seeds_roles_with_their_tiers() {
    let fx = setup().await;

    let tenant = fx.svc.create_tenant(school("school1")).await.unwrap();
    assert_eq!(tenant.id, "school1");

    let admin_role = fx
        .role_repo
        .get_by_name("school1", roles::ADMIN)
        .await
        .unwrap();
    let basic_role = fx
        .role_repo
        .get_by_name("school1", roles::BASIC)
        .await
        .unwrap();

    assert_eq!(
        claim_set(&fx, "school1", admin_role.id).await,
        names(&permissions::admin())
    );
    assert_eq!(
        claim_set(&fx, "school1", basic_role.id).await,
        names(&permissions::basic())
    );

    // No root-only permission ever lands in a school tenant.
    let admin_claims = claim_set(&fx, "school1", admin_role.id).await;
    for root_perm in permissions::root() {
        assert!(!admin_claims.contains(&root_perm.name()));
    }
}

#[tokio::test]
async fn create_tenant_seeds_the_admin_user() {
    let fx = setup().await;

    let tenant = fx.svc.create_tenant(school("school1")).await.unwrap();

    let admin = fx
        .user_repo
        .get_by_email("school1", "admin@school1.com")
        .await
        .unwrap();
    assert!(admin.is_active);
    assert!(admin.email_confirmed);
    assert!(admin.phone_confirmed);
    assert_eq!(admin.first_name, "Campus");

    let admin_role = fx
        .role_repo
        .get_by_name("school1", roles::ADMIN)
        .await
        .unwrap();
    assert!(
        fx.role_repo
            .is_member("school1", admin.id, admin_role.id)
            .await
            .unwrap()
    );

    // The seeded admin can log in with the configured password.
    let token_svc = TokenService::new(
        SurrealUserRepository::new(fx.db.clone()),
        AuthConfig {
            jwt_secret: "test-secret".into(),
            ..Default::default()
        },
    );
    let pair = token_svc
        .login(
            &tenant,
            LoginInput {
                email: "admin@school1.com".into(),
                password: "seed-me-once".into(),
            },
        )
        .await
        .unwrap();
    assert!(!pair.token.is_empty());
}

#[tokio::test]
async fn seeding_twice_changes_nothing() {
    let fx = setup().await;

    let tenant = fx.svc.create_tenant(school("school1")).await.unwrap();

    let admin_role = fx
        .role_repo
        .get_by_name("school1", roles::ADMIN)
        .await
        .unwrap();
    let before = claim_set(&fx, "school1", admin_role.id).await;

    // Re-running the bootstrap re-seeds every tenant.
    fx.svc.initialize().await.unwrap();

    assert_eq!(claim_set(&fx, "school1", admin_role.id).await, before);

    // Still exactly one admin user and one membership.
    assert_eq!(
        fx.role_repo
            .count_members("school1", admin_role.id)
            .await
            .unwrap(),
        1
    );
    assert_eq!(tenant.admin_email.as_deref(), Some("admin@school1.com"));
}

#[tokio::test]
async fn seeding_is_additive_only() {
    let fx = setup().await;

    fx.svc.create_tenant(school("school1")).await.unwrap();

    let basic_role = fx
        .role_repo
        .get_by_name("school1", roles::BASIC)
        .await
        .unwrap();

    // A grant outside the Basic tier, added by hand.
    fx.claim_repo
        .apply_diff(
            "school1",
            basic_role.id,
            permissions::CLAIM_TYPE,
            vec!["Permission.Users.View".into()],
            Vec::new(),
        )
        .await
        .unwrap();

    fx.svc.initialize().await.unwrap();

    let claims = claim_set(&fx, "school1", basic_role.id).await;
    assert!(claims.contains("Permission.Users.View"));
    for basic_perm in permissions::basic() {
        assert!(claims.contains(&basic_perm.name()));
    }
}

#[tokio::test]
async fn tenant_without_admin_email_gets_no_user() {
    let fx = setup().await;

    let mut input = school("school1");
    input.admin_email = None;
    fx.svc.create_tenant(input).await.unwrap();

    let err = fx
        .user_repo
        .get_by_email("school1", "admin@school1.com")
        .await
        .unwrap_err();
    assert!(matches!(err, CampusError::NotFound { .. }));

    // Roles are still provisioned.
    assert!(
        fx.role_repo
            .get_by_name("school1", roles::ADMIN)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn root_tenant_is_created_exactly_once() {
    let fx = setup().await;

    let first = fx.svc.ensure_root_tenant().await.unwrap();
    assert_eq!(first.id, tenancy::root::ID);
    assert!(first.is_active);
    assert_eq!(
        first.admin_email.as_deref(),
        Some(tenancy::root::ADMIN_EMAIL)
    );
    // 1-year validity window.
    let days = (first.valid_until - Utc::now()).num_days();
    assert!((360..=366).contains(&days), "window was {days} days");

    let second = fx.svc.ensure_root_tenant().await.unwrap();
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(fx.tenant_repo.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn initialize_seeds_the_root_tenant() {
    let fx = setup().await;

    fx.svc.initialize().await.unwrap();

    let root_admin_role = fx
        .role_repo
        .get_by_name(tenancy::root::ID, roles::ADMIN)
        .await
        .unwrap();
    let root_admin = fx
        .user_repo
        .get_by_email(tenancy::root::ID, tenancy::root::ADMIN_EMAIL)
        .await
        .unwrap();
    assert!(
        fx.role_repo
            .is_member(tenancy::root::ID, root_admin.id, root_admin_role.id)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn lifecycle_updates() {
    let fx = setup().await;
    fx.svc.create_tenant(school("school1")).await.unwrap();

    let deactivated = fx.svc.deactivate("school1").await.unwrap();
    assert!(!deactivated.is_active);

    let activated = fx.svc.activate("school1").await.unwrap();
    assert!(activated.is_active);

    let new_expiry = Utc::now() + Duration::days(365);
    let renewed = fx
        .svc
        .update_subscription("school1", new_expiry)
        .await
        .unwrap();
    assert!((renewed.valid_until - new_expiry).num_seconds().abs() <= 1);

    let err = fx.svc.activate("ghost").await.unwrap_err();
    assert!(matches!(err, CampusError::NotFound { .. }));

    assert_eq!(fx.svc.list_tenants().await.unwrap().len(), 1);
    assert_eq!(fx.svc.get_tenant("school1").await.unwrap().id, "school1");
}
