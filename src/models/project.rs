use serde::{Deserialize, Serialize};

/// Project model
///
/// A mapping project owns a grid of tasks and at most one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Option<i64>,
    pub name: String,
    pub created_ts: i64,
    pub modified_ts: i64,
}

impl Project {
    pub fn new(name: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: None,
            name,
            created_ts: now,
            modified_ts: now,
        }
    }
}
