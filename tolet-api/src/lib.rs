//! # To-Let API Server Library
//!
//! This library provides the HTTP layer of the rental marketplace: routing,
//! request extraction, error mapping and image storage.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Validating request extractors
//! - `middleware`: Bearer authentication for protected routes
//! - `routes`: API route handlers
//! - `uploads`: Listing image storage

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod uploads;
