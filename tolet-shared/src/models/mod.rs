/// Database models
///
/// # Models
///
/// - `account`: Registered users and their roles
/// - `listing`: Rental listings, search filters and ordering
/// - `inquiry`: Tenant inquiries about listings

pub mod account;
pub mod inquiry;
pub mod listing;
