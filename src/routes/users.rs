use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::models::{Role, User};
use crate::state::SharedState;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub external_id: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    auth.require_admin()?;

    let (Some(name), Some(external_id), Some(password_plain), Some(role)) = (
        non_empty(req.name.as_deref()),
        non_empty(req.external_id.as_deref()),
        non_empty(req.password.as_deref()),
        non_empty(req.role.as_deref()),
    ) else {
        return Err(AppError::BadRequest(
            "Name, external ID, password, and role are required".to_string(),
        ));
    };

    if password_plain.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let role: Role = role
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown role '{role}'")))?;

    let pw_hash = password::hash(password_plain).map_err(AppError::Internal)?;

    let user = db::users::create(
        &state.pool,
        external_id,
        Some(name),
        &pw_hash,
        role,
        Some(auth.external_id.as_str()),
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("A user with this external ID already exists".to_string())
        }
        _ => AppError::Database(e),
    })?;

    tracing::info!("User '{}' created by '{}'", user.external_id, auth.external_id);

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<User>>, AppError> {
    auth.require_admin()?;
    let users = db::users::list_all(&state.pool).await?;
    Ok(Json(users))
}

/// Any authenticated caller may rotate a password; knowing the current one
/// is the actual guard, as in the system this replaces.
pub async fn change_password(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (Some(current), Some(new)) = (
        non_empty(req.current_password.as_deref()),
        non_empty(req.new_password.as_deref()),
    ) else {
        return Err(AppError::BadRequest(
            "Current and new passwords are required".to_string(),
        ));
    };

    if new.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(
            "New password must be at least 6 characters".to_string(),
        ));
    }

    let user = db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !password::verify(current, &user.password_hash).map_err(AppError::Internal)? {
        return Err(AppError::Unauthorized(
            "Incorrect current password".to_string(),
        ));
    }

    if password::verify(new, &user.password_hash).map_err(AppError::Internal)? {
        return Err(AppError::BadRequest(
            "New password cannot be the same as current password".to_string(),
        ));
    }

    let pw_hash = password::hash(new).map_err(AppError::Internal)?;
    db::users::update_password(&state.pool, user.id, &pw_hash).await?;

    Ok(Json(serde_json::json!({
        "message": "Password changed successfully"
    })))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
