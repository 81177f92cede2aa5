use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::models::{Requisition, Status};

pub async fn insert(pool: &SqlitePool, req: &Requisition) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO requisitions (
            id, title, description, requisition_date, basin, block, area,
            dimension, return_date, data_type, objective, remarks,
            requester_name, requester_designation, requester_cpf,
            requester_mobile, requester_group, requested_by_user_id,
            requested_by_external_id, status, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                  $15, $16, $17, $18, $19, $20, $21)",
    )
    .bind(req.id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.requisition_date)
    .bind(&req.basin)
    .bind(&req.block)
    .bind(&req.area)
    .bind(&req.dimension)
    .bind(&req.return_date)
    .bind(&req.data_type)
    .bind(&req.objective)
    .bind(&req.remarks)
    .bind(&req.requester_name)
    .bind(&req.requester_designation)
    .bind(&req.requester_cpf)
    .bind(&req.requester_mobile)
    .bind(&req.requester_group)
    .bind(req.requested_by_user_id)
    .bind(&req.requested_by_external_id)
    .bind(req.status)
    .bind(req.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Requisition>, sqlx::Error> {
    sqlx::query_as::<_, Requisition>("SELECT * FROM requisitions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Stamp a decision onto a requisition. Returns the number of rows touched
/// so the caller can distinguish a missing record. A second decision on the
/// same record overwrites the first (last write wins).
pub async fn record_decision(
    pool: &SqlitePool,
    id: Uuid,
    status: Status,
    decided_by_user_id: Uuid,
    decided_by_external_id: &str,
    decided_by_name: Option<&str>,
    decision_at: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE requisitions
         SET status = $2,
             decided_by_user_id = $3,
             decided_by_external_id = $4,
             decided_by_name = $5,
             decision_at = $6
         WHERE id = $1",
    )
    .bind(id)
    .bind(status)
    .bind(decided_by_user_id)
    .bind(decided_by_external_id)
    .bind(decided_by_name)
    .bind(decision_at)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Optional filters, combined with AND. Substring filters are
/// case-insensitive (SQLite LIKE semantics).
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub status: Option<Status>,
    pub requested_by_user_id: Option<Uuid>,
    pub basin: Option<String>,
    pub user_group: Option<String>,
}

pub async fn list(pool: &SqlitePool, filter: &ListFilter) -> Result<Vec<Requisition>, sqlx::Error> {
    let mut query: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT * FROM requisitions WHERE 1=1");

    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status);
    }
    if let Some(user_id) = filter.requested_by_user_id {
        query.push(" AND requested_by_user_id = ").push_bind(user_id);
    }
    if let Some(basin) = &filter.basin {
        query.push(" AND basin LIKE ").push_bind(format!("%{basin}%"));
    }
    if let Some(group) = &filter.user_group {
        query
            .push(" AND requester_group LIKE ")
            .push_bind(format!("%{group}%"));
    }

    // Newest first; uuid v7 ids give a deterministic tie-break in creation order.
    query.push(" ORDER BY created_at DESC, id DESC");

    query
        .build_query_as::<Requisition>()
        .fetch_all(pool)
        .await
}
