use serde::{Deserialize, Serialize};

/// Owner of a set of expenses. `name` is the lookup key (exact match).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub created_at: String,
}
