/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `properties`: Listing search, detail, featured and creation
/// - `inquiries`: Tenant inquiries about listings
/// - `contact`: General contact form
/// - `stats`: Marketplace counters

pub mod auth;
pub mod contact;
pub mod health;
pub mod inquiries;
pub mod properties;
pub mod stats;
