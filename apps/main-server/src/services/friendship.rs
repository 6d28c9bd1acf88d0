//! Friendship invariant enforcement.
//!
//! Link and unlink mutate both endpoints' friend sets through the store's
//! pairwise update, so a one-sided link is never observable. Deletion is
//! guarded: a user keeps existing until every edge is unlinked.

use entities::User;
use user_store::UserStore;
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::services::popularity;

/// Links two users as friends, in both directions.
pub async fn link<S: UserStore>(store: &S, user_id: Uuid, friend_id: Uuid) -> ServerResult<()> {
    if user_id == friend_id {
        return Err(ServerError::SelfLink);
    }

    let user = get_existing(store, user_id).await?;
    let friend = get_existing(store, friend_id).await?;

    // Checked in both directions: an asymmetric pre-existing state counts
    // as already linked.
    if user.is_friend_of(&friend_id) || friend.is_friend_of(&user_id) {
        return Err(ServerError::AlreadyLinked);
    }

    store
        .update_user_pair(user_id, friend_id, &move |user: &mut User, friend: &mut User| {
            user.add_friend(friend_id);
            friend.add_friend(user_id);
            user.touch();
            friend.touch();
        })
        .await?;

    popularity::recompute(store, user_id).await?;
    popularity::recompute(store, friend_id).await?;

    tracing::info!(user_id = %user_id, friend_id = %friend_id, "Users linked");
    Ok(())
}

/// Removes the friendship between two users, in both directions.
///
/// Unlinking a pair that is not linked succeeds and changes nothing, an
/// intentional asymmetry with [`link`]: removal is a filter, and filtering
/// an absent element is a no-op rather than an error.
pub async fn unlink<S: UserStore>(store: &S, user_id: Uuid, friend_id: Uuid) -> ServerResult<()> {
    if user_id == friend_id {
        // No self-links exist, so there is nothing to remove.
        get_existing(store, user_id).await?;
        return Ok(());
    }

    store
        .update_user_pair(user_id, friend_id, &move |user: &mut User, friend: &mut User| {
            let was_linked = user.is_friend_of(&friend_id) || friend.is_friend_of(&user_id);
            user.remove_friend(&friend_id);
            friend.remove_friend(&user_id);
            if was_linked {
                user.touch();
                friend.touch();
            }
        })
        .await?;

    popularity::recompute(store, user_id).await?;
    popularity::recompute(store, friend_id).await?;

    tracing::info!(user_id = %user_id, friend_id = %friend_id, "Users unlinked");
    Ok(())
}

/// Deletes a user. Fails while the user still has friends.
pub async fn delete<S: UserStore>(store: &S, user_id: Uuid) -> ServerResult<()> {
    let user = get_existing(store, user_id).await?;

    if !user.friends.is_empty() {
        return Err(ServerError::StillLinked);
    }

    store.delete_user(user_id).await?;
    tracing::info!(user_id = %user_id, "User deleted");
    Ok(())
}

async fn get_existing<S: UserStore>(store: &S, user_id: Uuid) -> ServerResult<User> {
    store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User or friend not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use user_store::MemoryUserStore;

    async fn seed(store: &MemoryUserStore, name: &str, hobbies: &[&str]) -> Uuid {
        store
            .create_user(User::new(
                name,
                30,
                hobbies.iter().map(|h| h.to_string()).collect(),
            ))
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_link_is_symmetric() {
        let store = MemoryUserStore::new();
        let a = seed(&store, "A", &[]).await;
        let b = seed(&store, "B", &[]).await;

        link(&store, a, b).await.unwrap();

        let user_a = store.get_user(a).await.unwrap().unwrap();
        let user_b = store.get_user(b).await.unwrap().unwrap();
        assert!(user_a.is_friend_of(&b));
        assert!(user_b.is_friend_of(&a));
    }

    #[tokio::test]
    async fn test_link_self_fails() {
        let store = MemoryUserStore::new();
        let a = seed(&store, "A", &[]).await;

        assert!(matches!(link(&store, a, a).await, Err(ServerError::SelfLink)));
    }

    #[tokio::test]
    async fn test_link_missing_user_fails() {
        let store = MemoryUserStore::new();
        let a = seed(&store, "A", &[]).await;

        let result = link(&store, a, Uuid::new_v4()).await;
        assert!(matches!(result, Err(ServerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_link_fails() {
        let store = MemoryUserStore::new();
        let a = seed(&store, "A", &[]).await;
        let b = seed(&store, "B", &[]).await;

        link(&store, a, b).await.unwrap();
        assert!(matches!(link(&store, a, b).await, Err(ServerError::AlreadyLinked)));
        // The reverse direction is just as linked.
        assert!(matches!(link(&store, b, a).await, Err(ServerError::AlreadyLinked)));
    }

    #[tokio::test]
    async fn test_link_updates_popularity_on_both_endpoints() {
        let store = MemoryUserStore::new();
        let a = seed(&store, "A", &["x", "y"]).await;
        let b = seed(&store, "B", &["x", "z"]).await;

        link(&store, a, b).await.unwrap();

        // 1 friend + 1 shared hobby * 0.5
        assert_eq!(store.get_user(a).await.unwrap().unwrap().popularity_score, 1.5);
        assert_eq!(store.get_user(b).await.unwrap().unwrap().popularity_score, 1.5);
    }

    #[tokio::test]
    async fn test_unlink_removes_both_sides() {
        let store = MemoryUserStore::new();
        let a = seed(&store, "A", &["x"]).await;
        let b = seed(&store, "B", &["x"]).await;
        link(&store, a, b).await.unwrap();

        unlink(&store, a, b).await.unwrap();

        let user_a = store.get_user(a).await.unwrap().unwrap();
        let user_b = store.get_user(b).await.unwrap().unwrap();
        assert!(user_a.friends.is_empty());
        assert!(user_b.friends.is_empty());
        assert_eq!(user_a.popularity_score, 0.0);
        assert_eq!(user_b.popularity_score, 0.0);
    }

    #[tokio::test]
    async fn test_unlink_not_linked_is_noop() {
        let store = MemoryUserStore::new();
        let a = seed(&store, "A", &[]).await;
        let b = seed(&store, "B", &[]).await;
        let before = store.get_user(a).await.unwrap().unwrap();

        unlink(&store, a, b).await.unwrap();

        let after = store.get_user(a).await.unwrap().unwrap();
        assert!(after.friends.is_empty());
        assert_eq!(after.updated_at, before.updated_at);
    }

    #[tokio::test]
    async fn test_unlink_missing_user_fails() {
        let store = MemoryUserStore::new();
        let a = seed(&store, "A", &[]).await;

        let result = unlink(&store, a, Uuid::new_v4()).await;
        assert!(matches!(result, Err(ServerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_guard() {
        let store = MemoryUserStore::new();
        let a = seed(&store, "A", &[]).await;
        let b = seed(&store, "B", &[]).await;
        link(&store, a, b).await.unwrap();

        assert!(matches!(delete(&store, a).await, Err(ServerError::StillLinked)));

        unlink(&store, a, b).await.unwrap();
        delete(&store, a).await.unwrap();
        assert!(store.get_user(a).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_user_fails() {
        let store = MemoryUserStore::new();
        let result = delete(&store, Uuid::new_v4()).await;
        assert!(matches!(result, Err(ServerError::NotFound(_))));
    }
}
