use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::application::ActorRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

impl Claims {
    /// The authenticated account id. Tokens are minted with a UUID
    /// subject; anything else is rejected here.
    pub fn account_id(&self) -> Result<Uuid> {
        self.sub
            .parse()
            .map_err(|_| Error::Unauthorized("Malformed token subject".to_string()))
    }

    /// Role the token authorizes. Standing on a concrete job is the
    /// authorization guard's business, not the token's.
    pub fn actor_role(&self) -> Result<ActorRole> {
        let raw = self
            .role
            .as_deref()
            .ok_or_else(|| Error::Forbidden("Token carries no role".to_string()))?;
        raw.parse()
            .map_err(|_| Error::Forbidden(format!("Unknown role: {}", raw)))
    }
}

/// Decodes the bearer token and stashes the claims in request
/// extensions. Authentication only; all authorization happens in the
/// guard behind the handlers.
pub async fn require_bearer_auth(mut req: Request, next: Next) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"missing_authorization"})),
        )
            .into_response();
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"bad_authorization"})),
        )
            .into_response();
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"unsupported_scheme"})),
        )
            .into_response();
    };

    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => {
            req.extensions_mut().insert(data.claims);
            next.run(req).await
        }
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"invalid_token"})),
        )
            .into_response(),
    }
}
