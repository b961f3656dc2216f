//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - In-memory database with migrations and sample listings
//! - Router built exactly as in production
//! - Image store that keeps uploads in memory
//! - Request helpers (JSON, multipart, bearer tokens)

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tolet_api::app::{build_router, AppState};
use tolet_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, UploadConfig};
use tolet_api::uploads::{DiskImageStore, ImageStore, ImageUpload, UploadError};
use tolet_shared::db::migrations::run_migrations;
use tolet_shared::db::pool::{create_pool, DatabaseConfig as PoolConfig};
use tolet_shared::db::seed::seed_sample_listings;
use sqlx::SqlitePool;
use tower::Service as _;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret-key-0123456789";

const BOUNDARY: &str = "----tolet-test-boundary";

/// Image store that records uploads instead of writing files
///
/// `uploads` and `references` stay index-aligned; removed images leave both.
#[derive(Default)]
pub struct MemoryImageStore {
    pub uploads: Mutex<Vec<ImageUpload>>,
    pub references: Mutex<Vec<String>>,
    issued: AtomicUsize,
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn store(&self, upload: ImageUpload) -> Result<String, UploadError> {
        let reference = format!(
            "/uploads/mem-{}-{}",
            self.issued.fetch_add(1, Ordering::SeqCst),
            upload.file_name.clone().unwrap_or_default()
        );
        self.uploads.lock().unwrap().push(upload);
        self.references.lock().unwrap().push(reference.clone());
        Ok(reference)
    }

    async fn remove(&self, reference: &str) -> Result<(), UploadError> {
        let mut references = self.references.lock().unwrap();
        if let Some(index) = references.iter().position(|r| r == reference) {
            references.remove(index);
            self.uploads.lock().unwrap().remove(index);
        }
        Ok(())
    }
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
    pub config: Config,
    pub images: Arc<MemoryImageStore>,
    pub upload_dir: PathBuf,
}

pub fn test_config(upload_dir: PathBuf) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            ttl_hours: 24,
        },
        uploads: UploadConfig {
            dir: upload_dir,
            max_bytes: 1024 * 1024,
        },
        seed_sample_data: true,
    }
}

async fn seeded_pool() -> anyhow::Result<SqlitePool> {
    let db = create_pool(PoolConfig::in_memory()).await?;
    run_migrations(&db).await?;
    seed_sample_listings(&db).await?;
    Ok(db)
}

impl TestContext {
    /// Fresh in-memory store with the sample listings and in-memory images
    pub async fn new() -> anyhow::Result<Self> {
        let db = seeded_pool().await?;
        let upload_dir = std::env::temp_dir().join(format!("tolet-test-{}", Uuid::new_v4()));
        let config = test_config(upload_dir.clone());

        let images = Arc::new(MemoryImageStore::default());
        let state = AppState::new(db.clone(), config.clone(), images.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            images,
            upload_dir,
        })
    }

    /// Like [`TestContext::new`] but images are written to a temporary
    /// directory and served back under `/uploads`
    pub async fn with_disk_uploads() -> anyhow::Result<Self> {
        let db = seeded_pool().await?;
        let upload_dir = std::env::temp_dir().join(format!("tolet-test-{}", Uuid::new_v4()));
        let config = test_config(upload_dir.clone());

        let disk = DiskImageStore::new(upload_dir.clone());
        disk.ensure_dir().await?;

        let state = AppState::new(db.clone(), config.clone(), Arc::new(disk));
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            images: Arc::new(MemoryImageStore::default()),
            upload_dir,
        })
    }

    /// Sends a request and returns status and raw body
    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    /// Sends a request and parses the JSON body (`Value::Null` when empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = self.send_raw(request).await;
        if body.is_empty() {
            return (status, Value::Null);
        }
        let json = serde_json::from_slice(&body)
            .unwrap_or_else(|e| panic!("non-JSON body ({}): {}", e, String::from_utf8_lossy(&body)));
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Registers an account and returns its bearer token
    pub async fn register(&self, email: &str, role: &str) -> String {
        let (status, body) = self
            .post_json(
                "/api/register",
                serde_json::json!({
                    "name": "Test Account",
                    "email": email,
                    "phone": "01700000000",
                    "password": "Str0ng-Pass!",
                    "role": role,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Sends a listing creation form
    pub async fn post_listing(
        &self,
        token: Option<&str>,
        fields: &[(&str, &str)],
        files: &[(&str, &[u8])],
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/properties")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = builder
            .body(Body::from(multipart_body(fields, files)))
            .unwrap();
        self.send(request).await
    }

    pub async fn listing_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM listings")
            .fetch_one(&self.db)
            .await
            .unwrap()
    }
}

/// Encodes text fields and `images` file parts as multipart/form-data
pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }

    for (file_name, data) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{}\"\r\nContent-Type: image/jpeg\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Text fields of a complete, valid listing form
pub fn valid_listing_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("title", "Quiet 1BHK near Banani Lake"),
        ("description", "South facing, gas line connected"),
        ("location", "Banani, Dhaka"),
        ("area", "750 sq ft"),
        ("price", "22000"),
        ("bedrooms", "1"),
        ("bathrooms", "1"),
        ("property_type", "Studio"),
        ("amenities", "Lift, Security"),
    ]
}
