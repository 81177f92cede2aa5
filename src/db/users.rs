use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Role, User};

pub async fn create(
    pool: &SqlitePool,
    external_id: &str,
    name: Option<&str>,
    password_hash: &str,
    role: Role,
    created_by: Option<&str>,
) -> Result<User, sqlx::Error> {
    let user = User {
        id: Uuid::now_v7(),
        external_id: external_id.to_string(),
        name: name.map(str::to_string),
        password_hash: password_hash.to_string(),
        role,
        created_at: Utc::now(),
        created_by: created_by.map(str::to_string),
    };

    sqlx::query(
        "INSERT INTO users (id, external_id, name, password_hash, role, created_at, created_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(user.id)
    .bind(&user.external_id)
    .bind(&user.name)
    .bind(&user.password_hash)
    .bind(user.role)
    .bind(user.created_at)
    .bind(&user.created_by)
    .execute(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_external_id(
    pool: &SqlitePool,
    external_id: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE external_id = $1")
        .bind(external_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn update_password(
    pool: &SqlitePool,
    id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(())
}
