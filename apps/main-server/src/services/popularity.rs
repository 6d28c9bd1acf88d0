//! Popularity recomputation against the store.
//!
//! The formula itself lives in `entities`; this service resolves a user's
//! friend records, computes the score, and persists it. Recomputes always
//! run after the mutation that invalidated them, never before.

use entities::{User, popularity_score};
use user_store::{UserStore, UserStoreResult};
use uuid::Uuid;

/// Recomputes and persists the popularity score of one user.
///
/// A missing user yields `Ok(0.0)` without touching the store: recomputes
/// may race a concurrent delete, and a vanished user simply has no score.
pub async fn recompute<S: UserStore>(store: &S, user_id: Uuid) -> UserStoreResult<f64> {
    let Some(mut user) = store.get_user(user_id).await? else {
        tracing::debug!(user_id = %user_id, "Recompute skipped, user no longer exists");
        return Ok(0.0);
    };

    let friends = resolve_friends(store, &user).await?;
    let score = popularity_score(&user, &friends);
    user.popularity_score = score;
    store.update_user(user).await?;

    Ok(score)
}

/// Recomputes a user and every direct friend.
///
/// Used after hobby or other field updates: the shared-hobby overlap of each
/// friend with this user may have changed. Returns the user's own score.
pub async fn recompute_with_friends<S: UserStore>(
    store: &S,
    user_id: Uuid,
) -> UserStoreResult<f64> {
    let Some(user) = store.get_user(user_id).await? else {
        return Ok(0.0);
    };

    let score = recompute(store, user_id).await?;
    for friend_id in user.friends {
        recompute(store, friend_id).await?;
    }

    Ok(score)
}

/// Resolves the user's friend ids to records, skipping ids that no longer
/// exist (they still count toward the friend count, just share nothing).
async fn resolve_friends<S: UserStore>(store: &S, user: &User) -> UserStoreResult<Vec<User>> {
    let mut friends = Vec::with_capacity(user.friends.len());
    for friend_id in &user.friends {
        if let Some(friend) = store.get_user(*friend_id).await? {
            friends.push(friend);
        }
    }
    Ok(friends)
}
