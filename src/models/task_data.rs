use serde::{Deserialize, Serialize};

/// Per-task data layer: the dataset features that fall inside one task,
/// serialized as a FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskData {
    pub id: Option<i64>,
    pub project_id: i64,
    pub task_id: i64,
    pub dataset_id: i64,
    pub data: String,
    pub checksum: String,
    pub created_ts: i64,
    pub modified_ts: i64,
}
