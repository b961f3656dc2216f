/// Integration tests for account storage

use tolet_shared::auth::password::{hash_password, verify_password};
use tolet_shared::db::migrations::run_migrations;
use tolet_shared::db::pool::{create_pool, DatabaseConfig};
use tolet_shared::models::account::{Account, AccountRole, CreateAccount};
use sqlx::SqlitePool;

async fn test_pool() -> SqlitePool {
    let pool = create_pool(DatabaseConfig::in_memory()).await.expect("pool");
    run_migrations(&pool).await.expect("migrations");
    pool
}

fn account(email: &str, role: AccountRole) -> CreateAccount {
    CreateAccount {
        name: "Nusrat".to_string(),
        email: email.to_string(),
        phone: "01900000000".to_string(),
        password_hash: "not-a-real-hash".to_string(),
        role,
    }
}

#[tokio::test]
async fn test_create_and_find_account() {
    let pool = test_pool().await;

    let created = Account::create(&pool, account("nusrat@example.com", AccountRole::Tenant))
        .await
        .unwrap();
    assert!(created.id > 0);
    assert_eq!(created.role, AccountRole::Tenant);

    let by_id = Account::find_by_id(&pool, created.id).await.unwrap().expect("by id");
    assert_eq!(by_id.email, "nusrat@example.com");

    let by_email = Account::find_by_email(&pool, "Nusrat@Example.com").await.unwrap();
    assert_eq!(by_email.map(|a| a.id), Some(created.id));

    assert!(Account::find_by_email(&pool, "nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_unique_violation_and_first_survives() {
    let pool = test_pool().await;

    let first = Account::create(&pool, account("dup@example.com", AccountRole::Owner))
        .await
        .unwrap();

    let err = Account::create(&pool, account("DUP@example.com", AccountRole::Tenant))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert!(db_err.is_unique_violation());

    let survivor = Account::find_by_email(&pool, "dup@example.com").await.unwrap().unwrap();
    assert_eq!(survivor.id, first.id);
    assert_eq!(survivor.role, AccountRole::Owner);
}

#[tokio::test]
async fn test_count_by_role() {
    let pool = test_pool().await;
    Account::create(&pool, account("t1@example.com", AccountRole::Tenant)).await.unwrap();
    Account::create(&pool, account("t2@example.com", AccountRole::Tenant)).await.unwrap();
    Account::create(&pool, account("o1@example.com", AccountRole::Owner)).await.unwrap();

    assert_eq!(Account::count_by_role(&pool, AccountRole::Tenant).await.unwrap(), 2);
    assert_eq!(Account::count_by_role(&pool, AccountRole::Owner).await.unwrap(), 1);
    assert_eq!(Account::count_by_role(&pool, AccountRole::Admin).await.unwrap(), 0);
}

#[tokio::test]
async fn test_role_defaults_to_tenant_at_store_level() {
    let pool = test_pool().await;
    sqlx::query("INSERT INTO accounts (name, email, phone, password_hash) VALUES ('n', 'raw@example.com', 'p', 'h')")
        .execute(&pool)
        .await
        .unwrap();

    let account = Account::find_by_email(&pool, "raw@example.com").await.unwrap().unwrap();
    assert_eq!(account.role, AccountRole::Tenant);
}

#[tokio::test]
async fn test_stored_hash_verifies() {
    let pool = test_pool().await;
    let mut data = account("hash@example.com", AccountRole::Tenant);
    data.password_hash = hash_password("Correct-Horse-9").unwrap();

    let created = Account::create(&pool, data).await.unwrap();
    let stored = Account::find_by_id(&pool, created.id).await.unwrap().unwrap();

    assert!(verify_password("Correct-Horse-9", &stored.password_hash).unwrap());
    assert!(!verify_password("wrong", &stored.password_hash).unwrap());
}
