//! Graph projection.
//!
//! Converts the full user set into the node/edge shape the frontend canvas
//! renders. Pure: no store access, no side effects.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::User;

/// Payload carried by a graph node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNodeData {
    /// User id, repeated inside the payload for canvas state stability.
    pub id: Uuid,
    /// Display name.
    pub username: String,
    /// Age in years.
    pub age: u32,
    /// Current popularity score.
    pub popularity: f64,
    /// Hobby names.
    pub hobbies: Vec<String>,
    /// Human-readable label, `"<username> (<age>)"`.
    pub label: String,
}

/// A node in the projected graph, one per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// User id as a string.
    pub id: String,
    /// Node payload.
    pub data: GraphNodeData,
}

/// One friendship relation, deduplicated across both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Canonical edge id, see [`canonical_edge_id`].
    pub id: String,
    /// Endpoint on the side the edge was first seen from.
    pub source: String,
    /// The other endpoint.
    pub target: String,
}

/// Full node/edge projection of the social graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphProjection {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Builds the canonical id of the unordered pair `{a, b}`: both ids as
/// strings, sorted lexicographically, joined with `_`. A-linking-to-B and
/// B-linking-to-A therefore map to the same id.
pub fn canonical_edge_id(a: Uuid, b: Uuid) -> String {
    let (a, b) = (a.to_string(), b.to_string());
    if a < b {
        format!("{a}_{b}")
    } else {
        format!("{b}_{a}")
    }
}

/// Projects `users` into nodes and edges.
///
/// Nodes are emitted one per user, in input order. Edges are derived from
/// every `friends` entry and deduplicated by canonical id through a seen-set,
/// which keeps the edge list correct even if a one-sided link is transiently
/// present in storage. Edge order is insertion order over the outer user
/// iteration, not sorted.
pub fn project(users: &[User]) -> GraphProjection {
    let nodes = users
        .iter()
        .map(|u| GraphNode {
            id: u.id.to_string(),
            data: GraphNodeData {
                id: u.id,
                username: u.username.clone(),
                age: u.age,
                popularity: u.popularity_score,
                hobbies: u.hobbies.clone(),
                label: format!("{} ({})", u.username, u.age),
            },
        })
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut edges = Vec::new();
    for user in users {
        for friend_id in &user.friends {
            let id = canonical_edge_id(user.id, *friend_id);
            if seen.insert(id.clone()) {
                edges.push(GraphEdge {
                    id,
                    source: user.id.to_string(),
                    target: friend_id.to_string(),
                });
            }
        }
    }

    GraphProjection { nodes, edges }
}
