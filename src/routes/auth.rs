use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::jwt::{encode_token, Claims};
use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::models::Role;
use crate::state::SharedState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub external_id: Option<String>,
    pub password: Option<String>,
}

/// Identity summary plus the bearer token protected routes expect.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user_id: Uuid,
    pub external_id: String,
    pub name: Option<String>,
    pub role: Role,
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (Some(external_id), Some(password_plain)) = (
        req.external_id.as_deref().filter(|s| !s.is_empty()),
        req.password.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "External ID and password are required".to_string(),
        ));
    };

    if state.login_limiter.check(external_id).is_err() {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let user = db::users::find_by_external_id(&state.pool, external_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid external ID or password".to_string()))?;

    let valid =
        password::verify(password_plain, &user.password_hash).map_err(AppError::Internal)?;

    if !valid {
        state.login_limiter.record_failure(external_id);
        return Err(AppError::Unauthorized(
            "Invalid external ID or password".to_string(),
        ));
    }

    let claims = Claims::new(&user);
    let access_token = encode_token(&claims, &state.config.jwt_secret).map_err(AppError::Internal)?;

    Ok(Json(LoginResponse {
        access_token,
        user_id: user.id,
        external_id: user.external_id,
        name: user.name,
        role: user.role,
    }))
}
