//! The requisition state machine: creation into `pending_level2`, and the
//! single approval gate that moves a record to a terminal status.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::models::{Requisition, Status};

/// Identity recorded as having approved or denied a requisition. Only the
/// route layer mints these, after verifying the caller's role, so holding a
/// `Decider` is proof of authorization.
#[derive(Debug, Clone)]
pub struct Decider {
    pub user_id: Uuid,
    pub external_id: String,
    pub name: Option<String>,
}

/// Raw submission fields. The requester snapshot comes from the form; the
/// `requested_by_*` stamp comes from the authenticated session.
#[derive(Debug, Clone, Default)]
pub struct SubmitInput {
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
    pub requested_by_user_id: Uuid,
    pub requested_by_external_id: String,
}

/// Validate a submission, fill in generated and defaulted fields, and
/// persist it. Returns the full record as stored.
pub async fn submit(pool: &SqlitePool, input: SubmitInput) -> Result<Requisition, AppError> {
    let requisition = build(input)?;
    db::requisitions::insert(pool, &requisition).await?;
    Ok(requisition)
}

/// Record a terminal decision on an existing requisition. The transition is
/// unconditional: deciding an already-decided record overwrites the earlier
/// decision, last write wins.
pub async fn decide(
    pool: &SqlitePool,
    id: Uuid,
    status: Status,
    decider: &Decider,
) -> Result<(), AppError> {
    if !status.is_decision() {
        return Err(AppError::BadRequest(
            "Status must be 'approved' or 'denied'".to_string(),
        ));
    }

    let rows = db::requisitions::record_decision(
        pool,
        id,
        status,
        decider.user_id,
        &decider.external_id,
        decider.name.as_deref(),
        Utc::now(),
    )
    .await?;

    if rows == 0 {
        return Err(AppError::NotFound("Requisition not found".to_string()));
    }
    Ok(())
}

/// Pure part of `submit`: mandatory-field validation plus id, timestamp,
/// and title/description defaults.
fn build(input: SubmitInput) -> Result<Requisition, AppError> {
    let basin = require(input.basin.as_deref(), "Basin")?;
    let requester_cpf = require(input.requester_cpf.as_deref(), "CPF No.")?;
    let requester_mobile = require(input.requester_mobile.as_deref(), "Mobile No.")?;
    let requester_group = require(input.requester_group.as_deref(), "Group")?;

    let area_label = input
        .area
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or("N/A");
    let title = input
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| format!("Requisition for {basin} - {area_label}"));
    let description = input
        .description
        .clone()
        .filter(|d| !d.trim().is_empty())
        .or_else(|| input.objective.clone());

    Ok(Requisition {
        id: Uuid::now_v7(),
        title,
        description,
        requisition_date: input.requisition_date,
        basin,
        block: input.block,
        area: input.area,
        dimension: input.dimension,
        return_date: input.return_date,
        data_type: input.data_type,
        objective: input.objective,
        remarks: input.remarks,
        requester_name: input.requester_name,
        requester_designation: input.requester_designation,
        requester_cpf,
        requester_mobile,
        requester_group,
        requested_by_user_id: input.requested_by_user_id,
        requested_by_external_id: input.requested_by_external_id,
        status: Status::PendingLevel2,
        created_at: Utc::now(),
        decided_by_user_id: None,
        decided_by_external_id: None,
        decided_by_name: None,
        decision_at: None,
    })
}

fn require(value: Option<&str>, label: &str) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::BadRequest(format!("{label} is missing"))),
    }
}
