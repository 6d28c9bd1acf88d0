//! In-memory user store implementation.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use entities::User;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{PairwiseMutation, UserStore, UserStoreError, UserStoreResult};

/// In-memory user store backed by a single RwLock map.
///
/// Holding the write guard across both records of a pairwise update is what
/// gives `update_user_pair` its atomicity, so no retry loop is needed here.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    /// Creates a new in-memory user store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, user: User) -> UserStoreResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(UserStoreError::already_exists("User", user.id.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> UserStoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn list_users(&self) -> UserStoreResult<Vec<User>> {
        let users = self.users.read().await;
        let mut result: Vec<User> = users.values().cloned().collect();
        // Creation order, with the id as a tie-breaker, keeps projections
        // over this list reproducible.
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(result)
    }

    async fn update_user(&self, user: User) -> UserStoreResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(UserStoreError::not_found("User", user.id.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> UserStoreResult<()> {
        let mut users = self.users.write().await;
        if users.remove(&id).is_none() {
            return Err(UserStoreError::not_found("User", id.to_string()));
        }
        Ok(())
    }

    async fn update_user_pair(
        &self,
        first_id: Uuid,
        second_id: Uuid,
        mutate: PairwiseMutation<'_>,
    ) -> UserStoreResult<(User, User)> {
        if first_id == second_id {
            return Err(UserStoreError::Conflict(
                "pairwise update requires two distinct users".to_string(),
            ));
        }

        let mut users = self.users.write().await;
        let mut first = users
            .get(&first_id)
            .cloned()
            .ok_or_else(|| UserStoreError::not_found("User", first_id.to_string()))?;
        let mut second = users
            .get(&second_id)
            .cloned()
            .ok_or_else(|| UserStoreError::not_found("User", second_id.to_string()))?;

        mutate(&mut first, &mut second);

        users.insert(first.id, first.clone());
        users.insert(second.id, second.clone());
        tracing::debug!(first_id = %first_id, second_id = %second_id, "Applied pairwise update");

        Ok((first, second))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_user_crud() {
        let store = MemoryUserStore::new();

        // Create
        let user = User::new("alice", 30, vec!["reading".to_string()]);
        let created = store.create_user(user.clone()).await.unwrap();
        assert_eq!(created.username, "alice");

        // Duplicate create is rejected
        assert!(matches!(
            store.create_user(user.clone()).await,
            Err(UserStoreError::AlreadyExists { .. })
        ));

        // Get
        let fetched = store.get_user(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.username, "alice");

        // Update
        let mut updated = fetched.clone();
        updated.age = 31;
        let updated = store.update_user(updated).await.unwrap();
        assert_eq!(updated.age, 31);

        // Delete
        store.delete_user(created.id).await.unwrap();
        assert!(store.get_user(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_user_fails() {
        let store = MemoryUserStore::new();
        let user = User::new("ghost", 99, vec![]);

        assert!(matches!(
            store.update_user(user).await,
            Err(UserStoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_users_in_creation_order() {
        let store = MemoryUserStore::new();
        let mut expected = Vec::new();
        for (name, age) in [("a", 1), ("b", 2), ("c", 3)] {
            let user = store.create_user(User::new(name, age, vec![])).await.unwrap();
            expected.push((user.created_at, user.id));
        }
        // created_at ties fall back to id order
        expected.sort();

        let listed = store.list_users().await.unwrap();
        assert_eq!(
            listed.iter().map(|u| u.id).collect::<Vec<_>>(),
            expected.into_iter().map(|(_, id)| id).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_pairwise_update_writes_both_sides() {
        let store = MemoryUserStore::new();
        let a = store.create_user(User::new("a", 20, vec![])).await.unwrap();
        let b = store.create_user(User::new("b", 21, vec![])).await.unwrap();

        let (a_id, b_id) = (a.id, b.id);
        store
            .update_user_pair(a_id, b_id, &move |first, second| {
                first.add_friend(b_id);
                second.add_friend(a_id);
            })
            .await
            .unwrap();

        let a = store.get_user(a_id).await.unwrap().unwrap();
        let b = store.get_user(b_id).await.unwrap().unwrap();
        assert!(a.is_friend_of(&b_id));
        assert!(b.is_friend_of(&a_id));
    }

    #[tokio::test]
    async fn test_pairwise_update_missing_user_leaves_state_unchanged() {
        let store = MemoryUserStore::new();
        let a = store.create_user(User::new("a", 20, vec![])).await.unwrap();
        let ghost = Uuid::new_v4();

        let result = store
            .update_user_pair(a.id, ghost, &move |first, second| {
                first.add_friend(second.id);
                second.add_friend(first.id);
            })
            .await;

        assert!(matches!(result, Err(UserStoreError::NotFound { .. })));
        let a = store.get_user(a.id).await.unwrap().unwrap();
        assert!(a.friends.is_empty());
    }

    #[tokio::test]
    async fn test_pairwise_update_rejects_equal_ids() {
        let store = MemoryUserStore::new();
        let a = store.create_user(User::new("a", 20, vec![])).await.unwrap();

        let result = store.update_user_pair(a.id, a.id, &|_, _| {}).await;
        assert!(matches!(result, Err(UserStoreError::Conflict(_))));
    }
}
