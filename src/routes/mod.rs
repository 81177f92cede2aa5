pub mod auth;
pub mod requisitions;
pub mod users;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/login", post(auth::login))
        // Users
        .route("/api/v1/users", get(users::list).post(users::create))
        .route("/api/v1/users/{id}/password", put(users::change_password))
        // Requisitions
        .route(
            "/api/v1/requisitions",
            get(requisitions::list).post(requisitions::submit),
        )
        .route("/api/v1/requisitions/{id}", put(requisitions::decide))
        .route(
            "/api/v1/requisitions/{id}/export",
            get(requisitions::export),
        )
}
