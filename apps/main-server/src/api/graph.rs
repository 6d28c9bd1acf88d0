//! Graph projection endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};
use entities::GraphProjection;
use user_store::UserStore;

use crate::error::ServerResult;
use crate::state::AppState;

/// Returns the node/edge projection of the whole social graph.
///
/// Always recomputed from current store state; nothing is cached between
/// calls.
pub async fn get_graph<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<GraphProjection>> {
    let users = state.store.list_users().await?;
    let projection = entities::project(&users);

    tracing::debug!(
        nodes = projection.nodes.len(),
        edges = projection.edges.len(),
        "Graph projected"
    );
    Ok(Json(projection))
}
