/// Integration tests for the pool, migrations and sample data
///
/// Every test runs against its own in-memory SQLite database, except the
/// file-backed test which writes into the system temp directory.

use tolet_shared::db::migrations::{get_migration_status, run_migrations};
use tolet_shared::db::pool::{close_pool, create_pool, get_pool_stats, health_check, DatabaseConfig};
use tolet_shared::db::seed::seed_sample_listings;
use tolet_shared::models::listing::Listing;

#[tokio::test]
async fn test_create_in_memory_pool() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    assert!(health_check(&pool).await.is_ok());

    let row: (i64,) = sqlx::query_as("SELECT ?")
        .bind(42i64)
        .fetch_one(&pool)
        .await
        .expect("Failed to execute query");
    assert_eq!(row.0, 42);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_create_file_backed_pool_creates_missing_file() {
    let path = std::env::temp_dir().join(format!(
        "tolet-test-{}-{}.db",
        std::process::id(),
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));
    assert!(!path.exists());

    let pool = create_pool(DatabaseConfig {
        url: format!("sqlite://{}", path.display()),
        ..Default::default()
    })
    .await
    .expect("Failed to create pool");

    run_migrations(&pool).await.expect("Migrations failed");
    assert!(path.exists());

    close_pool(pool).await;
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_unreachable_database_is_rejected() {
    let result = create_pool(DatabaseConfig {
        url: "sqlite:///nonexistent-tolet-dir/nested/tolet.db".to_string(),
        connect_timeout_seconds: 2,
        ..Default::default()
    })
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_get_pool_stats() {
    let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();

    let stats = get_pool_stats(&pool);
    assert_eq!(stats.total_connections, 1);

    let conn = pool.acquire().await.expect("Failed to acquire connection");
    let stats = get_pool_stats(&pool);
    assert_eq!(stats.active_connections, 1);
    assert_eq!(stats.idle_connections, 0);
    drop(conn);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_migrations_apply_and_are_idempotent() {
    let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();

    let before = get_migration_status(&pool).await.unwrap();
    assert_eq!(before.applied_migrations, 0);
    assert!(!before.is_up_to_date);

    run_migrations(&pool).await.expect("First migration run failed");
    let first = get_migration_status(&pool).await.unwrap();
    assert!(first.applied_migrations > 0);
    assert!(first.is_up_to_date);
    assert!(first.latest_version.is_some());

    run_migrations(&pool).await.expect("Second migration run failed");
    let second = get_migration_status(&pool).await.unwrap();
    assert_eq!(first.applied_migrations, second.applied_migrations);

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('accounts', 'listings', 'inquiries') ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(tables, vec!["accounts", "inquiries", "listings"]);
}

#[tokio::test]
async fn test_seed_only_fills_empty_store() {
    let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();
    run_migrations(&pool).await.unwrap();

    assert_eq!(seed_sample_listings(&pool).await.unwrap(), 3);
    assert_eq!(seed_sample_listings(&pool).await.unwrap(), 0);
    assert_eq!(Listing::count(&pool).await.unwrap(), 3);

    let featured = Listing::featured(&pool, 6).await.unwrap();
    assert_eq!(featured.len(), 3);
    assert!(featured.iter().all(|l| l.owner_id.is_none()));
    assert_eq!(
        featured[2].amenities,
        vec!["AC", "Parking", "Security", "Lift"]
    );
}
