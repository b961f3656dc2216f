/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/register` - Create an account and receive a bearer token
/// - `POST /api/login` - Exchange email and password for a bearer token
///
/// Both answer with the same shape:
///
/// ```json
/// {
///   "token": "eyJ...",
///   "user": { "id": 1, "name": "...", "email": "...", "phone": "...", "role": "tenant" }
/// }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tolet_shared::{
    auth::{jwt, password},
    models::account::{Account, AccountProfile, AccountRole, CreateAccount},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 30, message = "Phone is required"))]
    pub phone: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Defaults to tenant
    #[serde(default)]
    pub role: Option<AccountRole>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register and login response
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Bearer token for protected endpoints
    pub token: String,

    pub user: AccountProfile,
}

fn issue_session(state: &AppState, account: &Account) -> ApiResult<SessionResponse> {
    let claims = jwt::Claims::new(account.id, account.email.clone(), account.role, state.config.token_ttl());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(SessionResponse {
        token,
        user: account.profile(),
    })
}

/// Register a new account
///
/// # Errors
///
/// - `400 Bad Request`: Body is not valid JSON or has an unknown role
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let password_hash = password::hash_password_async(req.password).await?;

    let account = Account::create(
        &state.db,
        CreateAccount {
            name: req.name,
            email: req.email,
            phone: req.phone,
            password_hash,
            role: req.role.unwrap_or_default(),
        },
    )
    .await?;

    tracing::info!(account_id = account.id, role = %account.role, "Account registered");

    Ok(Json(issue_session(&state, &account)?))
}

/// Login endpoint
///
/// Unknown emails and wrong passwords get the same response and both pay
/// for one Argon2id verification.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials
/// - `422 Unprocessable Entity`: Validation failed
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let Some(account) = Account::find_by_email(&state.db, &req.email).await? else {
        // Same hashing cost as a wrong password
        password::verify_decoy(req.password).await?;
        tracing::debug!("Login rejected: unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    let valid = password::verify_password_async(req.password, account.password_hash.clone()).await?;
    if !valid {
        tracing::debug!(account_id = account.id, "Login rejected: wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    Ok(Json(issue_session(&state, &account)?))
}
