//! API endpoints.

pub mod graph;
pub mod user;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use user_store::UserStore;

use crate::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router<S: UserStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // Graph projection; registered ahead of the /:id routes so "graph"
        // is never parsed as a user id.
        .route("/api/users/graph/all", get(graph::get_graph))
        // User CRUD
        .route("/api/users", get(user::list_users).post(user::create_user))
        .route(
            "/api/users/:id",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        // Friendship management
        .route("/api/users/:id/link", post(user::link_user))
        .route("/api/users/:id/unlink", delete(user::unlink_user))
        // Health check
        .route("/healthz", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
