//! Integration tests for the User repository using in-memory SurrealDB.

use campus_core::models::user::{CreateUser, UpdateUser};
use campus_core::repository::{Pagination, UserRepository};
use campus_db::repository::{SurrealUserRepository, verify_password};
use chrono::{Duration, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

const TENANT: &str = "school1";

async fn setup() -> SurrealUserRepository<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    campus_db::run_migrations(&db).await.unwrap();
    SurrealUserRepository::new(db)
}

fn alice() -> CreateUser {
    CreateUser {
        tenant_id: TENANT.to_string(),
        email: "alice@school1.com".into(),
        first_name: "Alice".into(),
        last_name: "Miller".into(),
        phone_number: Some("+355001122".into()),
        password: "correct-horse-battery".into(),
        is_active: true,
        email_confirmed: true,
        phone_confirmed: false,
    }
}

#[tokio::test]
async fn create_hashes_the_password() {
    let repo = setup().await;

    let user = repo.create(alice()).await.unwrap();
    assert_ne!(user.password_hash, "correct-horse-battery");
    assert!(user.password_hash.starts_with("$argon2"));
    assert!(verify_password("correct-horse-battery", &user.password_hash, None).unwrap());
    assert!(user.refresh_token.is_none());
}

#[tokio::test]
async fn get_by_email_is_tenant_scoped() {
    let repo = setup().await;
    let user = repo.create(alice()).await.unwrap();

    let fetched = repo.get_by_email(TENANT, "alice@school1.com").await.unwrap();
    assert_eq!(fetched.id, user.id);

    let err = repo
        .get_by_email("school2", "alice@school1.com")
        .await
        .unwrap_err();
    assert!(matches!(err, campus_core::CampusError::NotFound { .. }));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let repo = setup().await;
    repo.create(alice()).await.unwrap();

    assert!(repo.create(alice()).await.is_err());
}

#[tokio::test]
async fn update_user_fields() {
    let repo = setup().await;
    let user = repo.create(alice()).await.unwrap();

    let updated = repo
        .update(
            TENANT,
            user.id,
            UpdateUser {
                first_name: Some("Alicia".into()),
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.first_name, "Alicia");
    assert!(!updated.is_active);
    // Untouched fields survive.
    assert_eq!(updated.last_name, "Miller");
}

#[tokio::test]
async fn set_refresh_token_overwrites_prior_token() {
    let repo = setup().await;
    let user = repo.create(alice()).await.unwrap();

    let expiry = Utc::now() + Duration::days(7);
    repo.set_refresh_token(TENANT, user.id, "token-one".into(), expiry)
        .await
        .unwrap();

    let stored = repo.get_by_id(TENANT, user.id).await.unwrap();
    assert_eq!(stored.refresh_token.as_deref(), Some("token-one"));
    assert!(stored.refresh_token_expires_at.is_some());

    repo.set_refresh_token(TENANT, user.id, "token-two".into(), expiry)
        .await
        .unwrap();

    let rotated = repo.get_by_id(TENANT, user.id).await.unwrap();
    assert_eq!(rotated.refresh_token.as_deref(), Some("token-two"));
}

#[tokio::test]
async fn set_refresh_token_for_missing_user_is_not_found() {
    let repo = setup().await;

    let err = repo
        .set_refresh_token(
            TENANT,
            uuid::Uuid::new_v4(),
            "token".into(),
            Utc::now() + Duration::days(7),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, campus_core::CampusError::NotFound { .. }));
}

#[tokio::test]
async fn list_is_tenant_scoped() {
    let repo = setup().await;
    repo.create(alice()).await.unwrap();
    repo.create(CreateUser {
        tenant_id: "school2".into(),
        email: "bob@school2.com".into(),
        first_name: "Bob".into(),
        last_name: "Stone".into(),
        phone_number: None,
        password: "pw".into(),
        is_active: true,
        email_confirmed: false,
        phone_confirmed: false,
    })
    .await
    .unwrap();

    let page = repo.list(TENANT, Pagination::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].email, "alice@school1.com");
}
