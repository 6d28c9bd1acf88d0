//! User store trait definitions.

use async_trait::async_trait;
use entities::User;
use uuid::Uuid;

use crate::UserStoreResult;

/// Mutation applied to both sides of a user pair inside one atomic unit.
pub type PairwiseMutation<'a> = &'a (dyn Fn(&mut User, &mut User) + Send + Sync);

/// Trait for user storage operations.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates a new user.
    async fn create_user(&self, user: User) -> UserStoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: Uuid) -> UserStoreResult<Option<User>>;

    /// Lists all users in a deterministic order.
    async fn list_users(&self) -> UserStoreResult<Vec<User>>;

    /// Updates a user.
    async fn update_user(&self, user: User) -> UserStoreResult<User>;

    /// Deletes a user.
    async fn delete_user(&self, id: Uuid) -> UserStoreResult<()>;

    /// Applies `mutate` to two users as one atomic unit of work.
    ///
    /// Both records are loaded, mutated, and persisted with no concurrent
    /// read or write of either record interleaving; a one-sided friendship
    /// write must never become observable. Fails with `NotFound` if either
    /// id is absent and `Conflict` if the ids are equal.
    async fn update_user_pair(
        &self,
        first_id: Uuid,
        second_id: Uuid,
        mutate: PairwiseMutation<'_>,
    ) -> UserStoreResult<(User, User)>;
}
