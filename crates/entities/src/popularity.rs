//! Popularity scoring.
//!
//! `popularityScore = unique friend count + (hobbies shared with friends × 0.5)`

use crate::User;

/// Weight applied to each shared hobby.
pub const SHARED_HOBBY_WEIGHT: f64 = 0.5;

/// Counts the hobbies of `friend` that `user` also has.
pub fn shared_hobby_count(user: &User, friend: &User) -> usize {
    friend
        .hobbies
        .iter()
        .filter(|h| user.hobbies.contains(h))
        .count()
}

/// Computes the popularity score of `user` given its resolved friend records.
///
/// The friend count comes from the user's own id set; `friends` is only
/// consulted for hobby overlap, so ids that no longer resolve still count as
/// friends but contribute no shared hobbies. Overlaps are summed per friend,
/// not unioned: a hobby shared with two friends counts twice.
pub fn popularity_score(user: &User, friends: &[User]) -> f64 {
    let shared: usize = friends.iter().map(|f| shared_hobby_count(user, f)).sum();
    user.friends.len() as f64 + shared as f64 * SHARED_HOBBY_WEIGHT
}
