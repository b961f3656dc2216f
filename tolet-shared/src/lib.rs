//! # To-Let Shared Library
//!
//! Data model, store access and authentication primitives used by the
//! rental marketplace API server.
//!
//! ## Module Organization
//!
//! - `models`: Accounts, listings and inquiries with their queries
//! - `auth`: Password hashing, bearer tokens and request authentication
//! - `db`: Connection pool, migrations and sample data

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
