//! Integration tests for the Role repository and membership edges
//! using in-memory SurrealDB.

use campus_core::models::role::{CreateRole, UpdateRole};
use campus_core::models::user::CreateUser;
use campus_core::repository::{Pagination, RoleRepository, UserRepository};
use campus_db::repository::{SurrealRoleRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

const TENANT: &str = "school1";

/// Helper: spin up in-memory DB, run migrations, create two users.
async fn setup() -> (
    SurrealRoleRepository<surrealdb::engine::local::Db>,
    Uuid, // alice
    Uuid, // bob
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    campus_db::run_migrations(&db).await.unwrap();

    let user_repo = SurrealUserRepository::new(db.clone());
    let mut ids = Vec::new();
    for name in ["alice", "bob"] {
        let user = user_repo
            .create(CreateUser {
                tenant_id: TENANT.to_string(),
                email: format!("{name}@school1.com"),
                first_name: name.to_string(),
                last_name: "Example".into(),
                phone_number: None,
                password: "pass123".into(),
                is_active: true,
                email_confirmed: true,
                phone_confirmed: false,
            })
            .await
            .unwrap();
        ids.push(user.id);
    }

    (SurrealRoleRepository::new(db), ids[0], ids[1])
}

fn teacher_role() -> CreateRole {
    CreateRole {
        tenant_id: TENANT.to_string(),
        name: "Teacher".into(),
        description: "Teaching staff".into(),
    }
}

#[tokio::test]
async fn create_and_get_role() {
    let (repo, _, _) = setup().await;

    let role = repo.create(teacher_role()).await.unwrap();
    assert_eq!(role.tenant_id, TENANT);
    assert_eq!(role.name, "Teacher");

    let fetched = repo.get_by_id(TENANT, role.id).await.unwrap();
    assert_eq!(fetched.id, role.id);
}

#[tokio::test]
async fn get_by_name_is_case_insensitive() {
    let (repo, _, _) = setup().await;
    let role = repo.create(teacher_role()).await.unwrap();

    let fetched = repo.get_by_name(TENANT, "tEaChEr").await.unwrap();
    assert_eq!(fetched.id, role.id);

    let err = repo.get_by_name(TENANT, "Janitor").await.unwrap_err();
    assert!(matches!(err, campus_core::CampusError::NotFound { .. }));
}

#[tokio::test]
async fn duplicate_name_is_rejected_by_index() {
    let (repo, _, _) = setup().await;
    repo.create(teacher_role()).await.unwrap();

    assert!(repo.create(teacher_role()).await.is_err());
}

#[tokio::test]
async fn update_role_fields() {
    let (repo, _, _) = setup().await;
    let role = repo.create(teacher_role()).await.unwrap();

    let updated = repo
        .update(
            TENANT,
            role.id,
            UpdateRole {
                name: Some("Senior Teacher".into()),
                description: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Senior Teacher");
    assert_eq!(updated.description, "Teaching staff");
}

#[tokio::test]
async fn membership_roundtrip() {
    let (repo, alice, bob) = setup().await;
    let role = repo.create(teacher_role()).await.unwrap();

    assert!(!repo.is_member(TENANT, alice, role.id).await.unwrap());
    assert_eq!(repo.count_members(TENANT, role.id).await.unwrap(), 0);

    repo.assign_to_user(TENANT, alice, role.id).await.unwrap();
    repo.assign_to_user(TENANT, bob, role.id).await.unwrap();

    assert!(repo.is_member(TENANT, alice, role.id).await.unwrap());
    assert_eq!(repo.count_members(TENANT, role.id).await.unwrap(), 2);

    let alice_roles = repo.get_user_roles(TENANT, alice).await.unwrap();
    assert_eq!(alice_roles.len(), 1);
    assert_eq!(alice_roles[0].id, role.id);

    repo.unassign_from_user(TENANT, alice, role.id).await.unwrap();
    assert!(!repo.is_member(TENANT, alice, role.id).await.unwrap());
    assert_eq!(repo.count_members(TENANT, role.id).await.unwrap(), 1);
}

#[tokio::test]
async fn apply_membership_batches_assigns_and_unassigns() {
    let (repo, alice, _) = setup().await;
    let teacher = repo.create(teacher_role()).await.unwrap();
    let librarian = repo
        .create(CreateRole {
            tenant_id: TENANT.to_string(),
            name: "Librarian".into(),
            description: "Library staff".into(),
        })
        .await
        .unwrap();

    repo.assign_to_user(TENANT, alice, teacher.id).await.unwrap();

    // Swap teacher for librarian in one batch.
    repo.apply_membership(TENANT, alice, vec![librarian.id], vec![teacher.id])
        .await
        .unwrap();

    assert!(!repo.is_member(TENANT, alice, teacher.id).await.unwrap());
    assert!(repo.is_member(TENANT, alice, librarian.id).await.unwrap());
}

#[tokio::test]
async fn delete_role_removes_membership_edges() {
    let (repo, alice, _) = setup().await;
    let role = repo.create(teacher_role()).await.unwrap();
    repo.assign_to_user(TENANT, alice, role.id).await.unwrap();

    repo.delete(TENANT, role.id).await.unwrap();

    assert!(repo.get_user_roles(TENANT, alice).await.unwrap().is_empty());
    let err = repo.get_by_id(TENANT, role.id).await.unwrap_err();
    assert!(matches!(err, campus_core::CampusError::NotFound { .. }));
}

#[tokio::test]
async fn list_is_paginated() {
    let (repo, _, _) = setup().await;
    for i in 0..3 {
        repo.create(CreateRole {
            tenant_id: TENANT.to_string(),
            name: format!("Role{i}"),
            description: String::new(),
        })
        .await
        .unwrap();
    }

    let page = repo
        .list(
            TENANT,
            Pagination {
                offset: 0,
                limit: 2,
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
}
