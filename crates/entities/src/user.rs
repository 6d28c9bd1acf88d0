//! User entity definition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person node in the social graph.
///
/// `friends` holds one side of a symmetric relation: for any two users A and
/// B, `B.id ∈ A.friends` exactly when `A.id ∈ B.friends`. Both sides of a
/// link are always written as one unit, and the field has set semantics (no
/// duplicates, no self-reference).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier, assigned at creation.
    pub id: Uuid,
    /// Display name.
    pub username: String,
    /// Age in years.
    pub age: u32,
    /// Hobby names; order carries no meaning for scoring.
    pub hobbies: Vec<String>,
    /// IDs of linked users.
    pub friends: Vec<Uuid>,
    /// Derived score, recomputed after every mutation of `friends` or
    /// `hobbies`. Never set directly by a client.
    pub popularity_score: f64,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with no friends and a zero popularity score.
    pub fn new(username: impl Into<String>, age: u32, hobbies: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            age,
            hobbies,
            friends: Vec::new(),
            popularity_score: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if `id` is in this user's friend set.
    pub fn is_friend_of(&self, id: &Uuid) -> bool {
        self.friends.contains(id)
    }

    /// Adds `id` to the friend set. No-op if already present.
    pub fn add_friend(&mut self, id: Uuid) {
        if !self.friends.contains(&id) {
            self.friends.push(id);
        }
    }

    /// Removes `id` from the friend set. Removing an absent id is a no-op.
    pub fn remove_friend(&mut self, id: &Uuid) {
        self.friends.retain(|f| f != id);
    }

    /// Bumps the last-updated timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("alice", 30, vec!["reading".to_string()]);

        assert_eq!(user.username, "alice");
        assert_eq!(user.age, 30);
        assert!(user.friends.is_empty());
        assert_eq!(user.popularity_score, 0.0);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_add_friend_is_set_like() {
        let mut user = User::new("alice", 30, vec![]);
        let friend_id = Uuid::new_v4();

        user.add_friend(friend_id);
        user.add_friend(friend_id);

        assert_eq!(user.friends, vec![friend_id]);
    }

    #[test]
    fn test_remove_friend_is_idempotent() {
        let mut user = User::new("alice", 30, vec![]);
        let friend_id = Uuid::new_v4();

        user.add_friend(friend_id);
        user.remove_friend(&friend_id);
        user.remove_friend(&friend_id);

        assert!(user.friends.is_empty());
    }

    #[test]
    fn test_json_uses_camel_case_fields() {
        let user = User::new("alice", 30, vec![]);
        let value = serde_json::to_value(&user).unwrap();

        assert!(value.get("popularityScore").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("popularity_score").is_none());
    }
}
