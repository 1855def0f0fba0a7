use rusqlite::Connection;
use crate::error::JobError;
use crate::geojson::{Feature, FeatureCollection};
use crate::models::TaskStateKind;
use crate::repo::{TaskDataRepo, TaskRepo};
use crate::utils::compute_checksum;

/// What happened to a task's data layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerChange {
    Created,
    Updated,
    Unchanged,
}

impl LayerChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerChange::Created => "created",
            LayerChange::Updated => "updated",
            LayerChange::Unchanged => "unchanged",
        }
    }
}

/// Outcome for one task
#[derive(Debug, Clone)]
pub struct TaskUpdate {
    pub task_id: i64,
    pub feature_count: usize,
    pub change: LayerChange,
    /// State appended to the task history; `None` when the layer was unchanged
    pub state: Option<TaskStateKind>,
}

/// Write one task's layer and append its next workflow state.
///
/// Unchanged content leaves both the layer and the state history alone.
pub fn update_task_layer(
    conn: &Connection,
    project_id: i64,
    dataset_id: i64,
    task_id: i64,
    features: Vec<Feature>,
) -> Result<TaskUpdate, JobError> {
    let feature_count = features.len();
    let data = FeatureCollection::new(features)
        .to_json()
        .map_err(|source| JobError::Encode { task_id, source })?;
    let checksum = compute_checksum(&data);

    if TaskRepo::get(conn, project_id, task_id)?.is_none() {
        return Err(JobError::TaskVanished { project_id, task_id });
    }

    let change = match TaskDataRepo::get(conn, project_id, task_id)? {
        Some(existing) if existing.checksum == checksum => {
            log::debug!("Task {}: layer unchanged", task_id);
            return Ok(TaskUpdate {
                task_id,
                feature_count,
                change: LayerChange::Unchanged,
                state: None,
            });
        }
        Some(mut existing) => {
            TaskDataRepo::update_content(conn, &mut existing, dataset_id, &data, &checksum)?;
            LayerChange::Updated
        }
        None => {
            TaskDataRepo::create(conn, project_id, task_id, dataset_id, &data, &checksum)?;
            LayerChange::Created
        }
    };

    let state = TaskStateKind::for_feature_count(feature_count);
    TaskRepo::append_state(conn, project_id, task_id, state)?;
    log::debug!(
        "Task {}: layer {} with {} features, state {}",
        task_id,
        change.as_str(),
        feature_count,
        state.as_str()
    );

    Ok(TaskUpdate {
        task_id,
        feature_count,
        change,
        state: Some(state),
    })
}
