/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing, with blocking-pool async wrappers
/// - [`jwt`]: Bearer token issuance and validation
/// - [`bearer`]: Bearer token extraction and caller identity

pub mod bearer;
pub mod jwt;
pub mod password;
