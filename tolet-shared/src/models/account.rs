/// Account model and database operations
///
/// Accounts are created through registration and are never updated or
/// deleted. The password is stored only as an Argon2id PHC string.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE accounts (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name TEXT NOT NULL,
///     email TEXT NOT NULL UNIQUE COLLATE NOCASE,
///     phone TEXT NOT NULL,
///     password_hash TEXT NOT NULL,
///     role TEXT NOT NULL DEFAULT 'tenant',
///     created_at DATETIME NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tolet_shared::models::account::{Account, AccountRole, CreateAccount};
/// use tolet_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::in_memory()).await?;
///
/// let account = Account::create(&pool, CreateAccount {
///     name: "Rahim Uddin".to_string(),
///     email: "rahim@example.com".to_string(),
///     phone: "+8801700000000".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: AccountRole::Owner,
/// }).await?;
///
/// let found = Account::find_by_email(&pool, "RAHIM@example.com").await?;
/// assert_eq!(found.map(|a| a.id), Some(account.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Role carried by an account and encoded into its bearer tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// Prospective renter (default for self-registration)
    #[default]
    Tenant,

    /// Lists properties for rent
    Owner,

    /// Site administrator
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Tenant => "tenant",
            AccountRole::Owner => "owner",
            AccountRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored account record
///
/// `Debug` is derived, so never log a whole `Account` at info level: the
/// password hash would go with it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub name: String,

    /// Unique, compared case-insensitively
    pub email: String,
    pub phone: String,

    /// Argon2id PHC string
    pub password_hash: String,
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
}

/// Public view of an account, safe to return to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: AccountRole,
}

impl From<&Account> for AccountProfile {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            phone: account.phone.clone(),
            role: account.role,
        }
    }
}

/// Input for creating a new account
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub name: String,
    pub email: String,
    pub phone: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
    pub role: AccountRole,
}

impl Account {
    /// Inserts a new account
    ///
    /// # Errors
    ///
    /// Fails with a unique-constraint database error when the email is
    /// already registered (compared case-insensitively).
    pub async fn create(pool: &SqlitePool, data: CreateAccount) -> Result<Self, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (name, email, phone, password_hash, role)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, email, phone, password_hash, role, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        tracing::debug!(account_id = account.id, role = %account.role, "Account created");
        Ok(account)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, phone, password_hash, role, created_at
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds an account by email address, ignoring ASCII case
    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, phone, password_hash, role, created_at
            FROM accounts
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Counts accounts holding the given role
    pub async fn count_by_role(pool: &SqlitePool, role: AccountRole) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE role = ?")
            .bind(role)
            .fetch_one(pool)
            .await
    }

    pub fn profile(&self) -> AccountProfile {
        AccountProfile::from(self)
    }
}
