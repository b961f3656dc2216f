/// Inquiry endpoint
///
/// `POST /api/inquiries` stores a prospective tenant's message about a
/// listing. The listing id is stored as given; it is not checked.

use crate::{app::AppState, error::ApiResult, extract::ValidatedJson};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tolet_shared::models::inquiry::{CreateInquiry, Inquiry};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct InquiryRequest {
    pub property_id: Option<i64>,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,

    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InquiryResponse {
    pub id: i64,
    pub message: String,
}

/// Submit an inquiry
///
/// # Errors
///
/// - `400 Bad Request`: Body is not valid JSON
/// - `422 Unprocessable Entity`: Name, email or phone missing
pub async fn create_inquiry(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<InquiryRequest>,
) -> ApiResult<Json<InquiryResponse>> {
    let inquiry = Inquiry::create(
        &state.db,
        CreateInquiry {
            property_id: req.property_id,
            name: req.name,
            email: req.email,
            phone: req.phone,
            message: req.message.filter(|m| !m.trim().is_empty()),
        },
    )
    .await?;

    tracing::info!(inquiry_id = inquiry.id, property_id = ?inquiry.property_id, "Inquiry submitted");

    Ok(Json(InquiryResponse {
        id: inquiry.id,
        message: "Inquiry submitted successfully".to_string(),
    }))
}
