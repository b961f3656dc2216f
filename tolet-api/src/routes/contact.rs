/// Contact form endpoint
///
/// Submissions are written to the log and acknowledged. Nothing is stored or
/// delivered.

use crate::{error::ApiResult, extract::ValidatedJson};
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub phone: Option<String>,

    pub subject: Option<String>,

    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub message: String,
}

pub async fn send_message(
    ValidatedJson(req): ValidatedJson<ContactRequest>,
) -> ApiResult<Json<ContactResponse>> {
    tracing::info!(
        name = %req.name,
        email = %req.email,
        phone = ?req.phone,
        subject = ?req.subject,
        message = %req.message,
        "Contact form submission"
    );

    Ok(Json(ContactResponse {
        message: "Message sent successfully".to_string(),
    }))
}
