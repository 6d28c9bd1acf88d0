//! User API endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use entities::User;
use serde::{Deserialize, Serialize};
use user_store::UserStore;
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::services::{friendship, popularity};
use crate::state::AppState;

/// Payload for creating a user. Fields are optional so an incomplete body
/// surfaces as a 400 validation failure rather than a deserialization error.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub age: Option<u32>,
    pub hobbies: Option<Vec<String>>,
}

/// Payload for a partial user update. Friends and the popularity score are
/// deliberately absent: they only change through link/unlink and recompute.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub age: Option<u32>,
    pub hobbies: Option<Vec<String>>,
}

/// Payload naming the other endpoint of a link or unlink.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    pub friend_id: Option<Uuid>,
}

/// Confirmation body for mutations without a richer payload.
#[derive(Debug, Serialize)]
pub struct Confirmation {
    pub message: &'static str,
}

/// Lists all users.
pub async fn list_users<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Vec<User>>> {
    let users = state.store.list_users().await?;
    Ok(Json(users))
}

/// Gets a user by ID.
pub async fn get_user<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<User>> {
    let user_id = parse_user_id(&id)?;

    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Creates a user.
pub async fn create_user<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<CreateUserRequest>,
) -> ServerResult<(StatusCode, Json<User>)> {
    let (Some(username), Some(age), Some(hobbies)) =
        (request.username, request.age, request.hobbies)
    else {
        return Err(ServerError::Validation("Invalid user data".to_string()));
    };
    if username.trim().is_empty() {
        return Err(ServerError::Validation("Invalid user data".to_string()));
    }

    let user = state.store.create_user(User::new(username, age, hobbies)).await?;
    // Trivially zero for a friendless new user, but keeps the score field
    // derived from day one.
    popularity::recompute(&state.store, user.id).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Applies a partial update to a user.
pub async fn update_user<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> ServerResult<Json<User>> {
    let user_id = parse_user_id(&id)?;

    let mut user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    if let Some(username) = request.username {
        if username.trim().is_empty() {
            return Err(ServerError::Validation("Invalid user data".to_string()));
        }
        user.username = username;
    }
    if let Some(age) = request.age {
        user.age = age;
    }
    if let Some(hobbies) = request.hobbies {
        user.hobbies = hobbies;
    }
    user.touch();

    state.store.update_user(user).await?;
    // The user's own overlap changed and so did every friend's overlap with
    // this user.
    popularity::recompute_with_friends(&state.store, user_id).await?;

    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user_id, "User updated");
    Ok(Json(user))
}

/// Deletes a user. Refused while the user still has friends.
pub async fn delete_user<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<Confirmation>> {
    let user_id = parse_user_id(&id)?;

    friendship::delete(&state.store, user_id).await?;

    Ok(Json(Confirmation { message: "User deleted" }))
}

/// Links a user to a friend.
pub async fn link_user<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(request): Json<FriendRequest>,
) -> ServerResult<Json<Confirmation>> {
    let user_id = parse_user_id(&id)?;
    let friend_id = request
        .friend_id
        .ok_or_else(|| ServerError::Validation("friendId required".to_string()))?;

    friendship::link(&state.store, user_id, friend_id).await?;

    Ok(Json(Confirmation { message: "Users linked" }))
}

/// Unlinks a user from a friend.
pub async fn unlink_user<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(request): Json<FriendRequest>,
) -> ServerResult<Json<Confirmation>> {
    let user_id = parse_user_id(&id)?;
    let friend_id = request
        .friend_id
        .ok_or_else(|| ServerError::Validation("friendId required".to_string()))?;

    friendship::unlink(&state.store, user_id, friend_id).await?;

    Ok(Json(Confirmation { message: "Users unlinked" }))
}

fn parse_user_id(id: &str) -> ServerResult<Uuid> {
    id.parse()
        .map_err(|_| ServerError::Validation("Invalid user id".to_string()))
}
