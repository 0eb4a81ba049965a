//! Bearer token authentication
//!
//! Tokens are HS256 JWTs whose `sub` claim is the user id. The middleware
//! validates the token once and stores an [`AuthContext`] in the request
//! extensions for handlers to read.
//!
//! With auth disabled every request acts as a single local user, created on
//! first use.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{AppError, AppState};

/// Environment variable holding the token signing secret
pub const TOKEN_SECRET_ENV: &str = "FINANCEPLAY_TOKEN_SECRET";

/// Identity used for every request when auth is disabled
pub const LOCAL_USER_EMAIL: &str = "local@financeplay.local";

/// Authorization header for bearer tokens
const AUTHORIZATION_HEADER: &str = "authorization";

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    Token,
    /// Auth disabled, local single-user mode
    None,
}

/// Authenticated caller, inserted by the middleware
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub email: String,
    pub method: AuthMethod,
}

/// Sign a token for a user
pub fn issue_token(
    user_id: i64,
    email: &str,
    secret: &str,
    ttl_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthContext, AppError> {
    if !state.config.require_auth {
        let user = state
            .db
            .get_or_create_user(LOCAL_USER_EMAIL, Some("Local user"))?;
        return Ok(AuthContext {
            user_id: user.id,
            email: user.email,
            method: AuthMethod::None,
        });
    }

    let token = bearer_token(headers)
        .ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;

    let claims = verify_token(token, &state.config.token_secret).map_err(|e| {
        warn!(error = %e, "Invalid bearer token");
        AppError::unauthorized("Invalid or expired token")
    })?;

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

    // The user must still exist
    let user = state
        .db
        .get_user(user_id)?
        .ok_or_else(|| AppError::unauthorized("Unknown user"))?;

    Ok(AuthContext {
        user_id: user.id,
        email: user.email,
        method: AuthMethod::Token,
    })
}

/// Authentication middleware - validates the bearer token (or resolves the local user)
pub(crate) async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, request.headers()) {
        Ok(ctx) => {
            debug!(user_id = ctx.user_id, path = %request.uri().path(), "Authenticated");
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Err(e) => {
            warn!(path = %request.uri().path(), "Unauthorized request");
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let token = issue_token(7, "a@example.com", "secret", 1).unwrap();
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.email, "a@example.com");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(7, "a@example.com", "secret", 1).unwrap();
        assert!(verify_token(&token, "other").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = issue_token(7, "a@example.com", "secret", -2).unwrap();
        assert!(verify_token(&token, "secret").is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());
        headers.insert(AUTHORIZATION_HEADER, "Bearer abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc"));
        headers.insert(AUTHORIZATION_HEADER, "Basic abc".parse().unwrap());
        assert!(bearer_token(&headers).is_none());
    }
}
