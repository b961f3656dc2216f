/// Inquiry model
///
/// An inquiry is a prospective tenant's message about a listing. The listing
/// reference is not checked: inquiries about unknown or missing listings are
/// stored as submitted. Inquiries are write-only here; there is no inbox.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Follow-up state of an inquiry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    Pending,
    Responded,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Inquiry {
    pub id: i64,

    /// Listing the inquiry is about; may reference no existing listing
    pub property_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: Option<String>,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateInquiry {
    pub property_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: Option<String>,
}

impl Inquiry {
    /// Stores a new inquiry with status `pending`
    pub async fn create(pool: &SqlitePool, data: CreateInquiry) -> Result<Self, sqlx::Error> {
        let inquiry = sqlx::query_as::<_, Inquiry>(
            r#"
            INSERT INTO inquiries (property_id, name, email, phone, message)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, property_id, name, email, phone, message, status, created_at
            "#,
        )
        .bind(data.property_id)
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.message)
        .fetch_one(pool)
        .await?;

        tracing::debug!(inquiry_id = inquiry.id, property_id = ?inquiry.property_id, "Inquiry stored");
        Ok(inquiry)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Inquiry>(
            r#"
            SELECT id, property_id, name, email, phone, message, status, created_at
            FROM inquiries
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
