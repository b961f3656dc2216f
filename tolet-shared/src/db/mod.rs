/// Database layer
///
/// # Modules
///
/// - `pool`: SQLite connection pool management with health checks
/// - `migrations`: Embedded schema migrations
/// - `seed`: Sample listings inserted into an empty store
///
/// Models live in the `models` module at crate root level.

pub mod migrations;
pub mod pool;
pub mod seed;
