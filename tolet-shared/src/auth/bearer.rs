/// Bearer-token authentication
///
/// Extracts the token from `Authorization: Bearer <token>`, validates it and
/// yields the caller's [`AuthContext`]. The HTTP layer decides how failures
/// are rendered.
///
/// Failure classes:
/// - no usable bearer token → [`AuthError::MissingCredentials`]
/// - token present but not acceptable → [`AuthError::InvalidToken`]
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use chrono::Duration;
/// use tolet_shared::auth::{bearer::authenticate, jwt::{create_token, Claims}};
/// use tolet_shared::models::account::AccountRole;
///
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let claims = Claims::new(4, "owner@example.com", AccountRole::Owner, Duration::hours(1));
/// let token = create_token(&claims, secret).unwrap();
///
/// let mut headers = HeaderMap::new();
/// headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token)).unwrap());
///
/// assert_eq!(authenticate(&headers, secret).unwrap().account_id, 4);
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_token, Claims, JwtError};
use crate::models::account::AccountRole;

/// Identity of the caller, attached to authenticated requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub account_id: i64,
    pub email: String,
    pub role: AccountRole,
}

impl AuthContext {
    /// Builds the context from validated claims
    pub fn from_claims(claims: &Claims) -> Result<Self, JwtError> {
        Ok(Self {
            account_id: claims.account_id()?,
            email: claims.email.clone(),
            role: claims.role,
        })
    }
}

/// Error type for bearer authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No bearer token in the request
    #[error("Missing bearer token")]
    MissingCredentials,

    /// Bearer token failed verification
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
            other => AuthError::InvalidToken(other.to_string()),
        }
    }
}

/// Returns the bearer token from the `Authorization` header, if any
///
/// The scheme is matched case-insensitively; an empty token counts as absent.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Validates the request's bearer token and returns the caller identity
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = extract_bearer_token(headers).ok_or(AuthError::MissingCredentials)?;
    let claims = validate_token(token, secret)?;
    Ok(AuthContext::from_claims(&claims)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;
    use axum::http::HeaderValue;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&headers_with("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer_token(&headers_with("bearer abc")), Some("abc"));
        assert_eq!(extract_bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(extract_bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(extract_bearer_token(&headers_with("abc")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_authenticate_valid_token() {
        let claims = Claims::new(11, "owner@example.com", AccountRole::Owner, Duration::hours(1));
        let token = create_token(&claims, SECRET).unwrap();

        let context = authenticate(&headers_with(&format!("Bearer {}", token)), SECRET).unwrap();
        assert_eq!(
            context,
            AuthContext {
                account_id: 11,
                email: "owner@example.com".to_string(),
                role: AccountRole::Owner,
            }
        );
    }

    #[test]
    fn test_authenticate_missing_vs_invalid() {
        let missing = authenticate(&HeaderMap::new(), SECRET).unwrap_err();
        assert!(matches!(missing, AuthError::MissingCredentials));

        let missing = authenticate(&headers_with("Basic dXNlcjpwYXNz"), SECRET).unwrap_err();
        assert!(matches!(missing, AuthError::MissingCredentials));

        let invalid = authenticate(&headers_with("Bearer not-a-jwt"), SECRET).unwrap_err();
        assert!(matches!(invalid, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_authenticate_expired_token_is_rejected() {
        let claims = Claims::new(1, "a@example.com", AccountRole::Tenant, Duration::seconds(-60));
        let token = create_token(&claims, SECRET).unwrap();

        let err = authenticate(&headers_with(&format!("Bearer {}", token)), SECRET).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
        assert_eq!(err.to_string(), "Invalid token: Token expired");
    }
}
