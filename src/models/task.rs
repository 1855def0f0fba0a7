use serde::{Deserialize, Serialize};
use crate::geojson::Geometry;

/// Workflow state of a task
///
/// States are appended to a task's history and never edited:
/// - Ready: the task has work for mappers
/// - Done: a mapper finished the task
/// - Validated: the work was checked (or there was nothing to do)
/// - Invalidated: the work was rejected and must be redone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStateKind {
    Ready,
    Done,
    Validated,
    Invalidated,
}

impl TaskStateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStateKind::Ready => "ready",
            TaskStateKind::Done => "done",
            TaskStateKind::Validated => "validated",
            TaskStateKind::Invalidated => "invalidated",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ready" => Some(TaskStateKind::Ready),
            "done" => Some(TaskStateKind::Done),
            "validated" => Some(TaskStateKind::Validated),
            "invalidated" => Some(TaskStateKind::Invalidated),
            _ => None,
        }
    }

    /// State appended after a data layer refresh: a task with no features
    /// needs no mapping and goes straight to validated.
    pub fn for_feature_count(count: usize) -> Self {
        if count == 0 {
            TaskStateKind::Validated
        } else {
            TaskStateKind::Ready
        }
    }
}

/// Task model: one cell of a project's grid
///
/// Tasks are keyed by `(project_id, id)`. The geometry is immutable and
/// stored in WGS84.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub geometry: Geometry,
    pub created_ts: i64,
}

/// One entry of a task's append-only state history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskState {
    pub id: Option<i64>,
    pub project_id: i64,
    pub task_id: i64,
    pub state: TaskStateKind,
    pub created_ts: i64,
}

impl TaskState {
    pub fn new(project_id: i64, task_id: i64, state: TaskStateKind) -> Self {
        Self {
            id: None,
            project_id,
            task_id,
            state,
            created_ts: chrono::Utc::now().timestamp(),
        }
    }
}
