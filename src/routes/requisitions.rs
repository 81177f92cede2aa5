use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::requisitions::ListFilter;
use crate::error::AppError;
use crate::models::{Requisition, Status};
use crate::render::document;
use crate::requisition::lifecycle::{self, Decider, SubmitInput};
use crate::state::SharedState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub requisition_date: Option<String>,
    pub basin: Option<String>,
    pub block: Option<String>,
    pub area: Option<String>,
    pub dimension: Option<String>,
    pub return_date: Option<String>,
    pub data_type: Option<String>,
    pub objective: Option<String>,
    pub remarks: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub requester_name: Option<String>,
    pub requester_designation: Option<String>,
    pub requester_cpf: Option<String>,
    pub requester_mobile: Option<String>,
    pub requester_group: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<String>,
    pub requested_by_user_id: Option<Uuid>,
    pub basin: Option<String>,
    pub user_group: Option<String>,
}

#[derive(Deserialize)]
pub struct DecideRequest {
    pub status: Option<String>,
}

pub async fn submit(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<Requisition>), AppError> {
    let input = SubmitInput {
        requisition_date: req.requisition_date,
        basin: req.basin,
        block: req.block,
        area: req.area,
        dimension: req.dimension,
        return_date: req.return_date,
        data_type: req.data_type,
        objective: req.objective,
        remarks: req.remarks,
        title: req.title,
        description: req.description,
        requester_name: req.requester_name,
        requester_designation: req.requester_designation,
        requester_cpf: req.requester_cpf,
        requester_mobile: req.requester_mobile,
        requester_group: req.requester_group,
        requested_by_user_id: auth.user_id,
        requested_by_external_id: auth.external_id,
    };

    let requisition = lifecycle::submit(&state.pool, input).await?;

    tracing::info!(
        "Requisition {} submitted by '{}'",
        requisition.id,
        requisition.requested_by_external_id
    );

    Ok((StatusCode::CREATED, Json(requisition)))
}

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Requisition>>, AppError> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(s) => Some(
            s.parse::<Status>()
                .map_err(|_| AppError::BadRequest(format!("Unknown status '{s}'")))?,
        ),
        None => None,
    };

    let filter = ListFilter {
        status,
        requested_by_user_id: query.requested_by_user_id,
        basin: query.basin,
        user_group: query.user_group,
    };

    let requisitions = db::requisitions::list(&state.pool, &filter).await?;
    Ok(Json(requisitions))
}

pub async fn decide(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DecideRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_decider()?;

    let Some(status_str) = req.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return Err(AppError::BadRequest("New status is required".to_string()));
    };

    let status: Status = status_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown status '{status_str}'")))?;

    let decider = Decider {
        user_id: auth.user_id,
        external_id: auth.external_id.clone(),
        name: auth.name.clone(),
    };

    lifecycle::decide(&state.pool, id, status, &decider).await?;

    tracing::info!(
        "Requisition {id} marked {} by '{}'",
        status.as_str(),
        decider.external_id
    );

    Ok(Json(serde_json::json!({
        "message": format!("Requisition {id} status updated to {}", status.as_str())
    })))
}

pub async fn export(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let requisition = db::requisitions::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Requisition not found".to_string()))?;

    let doc = document::project(&requisition);
    let bytes = state.renderer.render(&doc);

    let disposition = format!(
        "attachment; filename=\"requisition_{id}.{}\"",
        state.renderer.file_extension()
    );

    Ok((
        [
            (header::CONTENT_TYPE, state.renderer.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
