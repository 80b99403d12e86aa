use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::auth::Claims;
use crate::config;
use crate::error::ApiError;

/// Authenticated caller extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub subject: String,
    pub username: Option<String>,
    pub roles: Vec<String>,
}

impl AuthUser {
    /// True when the caller holds at least one of `roles`
    pub fn has_one_of_roles(&self, roles: &[String]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            username: claims.preferred_username.or(claims.name),
            roles: claims.groups,
        }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    let claims = validate_jwt(&token).map_err(|msg| {
        tracing::debug!("Rejected bearer token: {}", msg);
        ApiError::unauthorized(msg)
    })?;

    // Convert claims to AuthUser and inject into request
    let auth_user = AuthUser::from(claims);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Write gate for create/update: requires one of `security.write_roles` when configured
pub fn ensure_write_role(auth_user: &AuthUser) -> Result<(), ApiError> {
    check_write_role(auth_user, &config::config().security.write_roles)
}

fn check_write_role(auth_user: &AuthUser, write_roles: &[String]) -> Result<(), ApiError> {
    if write_roles.is_empty() || auth_user.has_one_of_roles(write_roles) {
        return Ok(());
    }
    tracing::warn!("Access denied for '{}': missing write role", auth_user.subject);
    Err(ApiError::forbidden("Access Denied"))
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Validate JWT token and extract claims
pub fn validate_jwt(token: &str) -> Result<Claims, String> {
    let security = &config::config().security;

    if security.jwt_secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    match &security.jwt_audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}
