use std::path::PathBuf;
use thiserror::Error;

/// Failures of a data layer generation run
///
/// Lookup misses are never errors (they select the "create" branch), and
/// unchanged content is reported through `JobOutcome`, not here.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Dataset file not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    #[error("Failed to read dataset file: {}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid GeoJSON in {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Project {0} not found")]
    ProjectNotFound(i64),

    #[error("No license configured for the new dataset of project {project_id}. Set dataset.license in the rc file.")]
    MissingLicense { project_id: i64 },

    #[error("License {0} not found")]
    LicenseNotFound(i64),

    #[error("Task {task_id} of project {project_id} disappeared during the run")]
    TaskVanished { project_id: i64, task_id: i64 },

    #[error("Failed to serialize data layer for task {task_id}")]
    Encode {
        task_id: i64,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl JobError {
    /// User errors exit with code 1; everything else is internal (code 2).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            JobError::InputNotFound { .. }
                | JobError::InputUnreadable { .. }
                | JobError::Parse { .. }
                | JobError::ProjectNotFound(_)
                | JobError::MissingLicense { .. }
                | JobError::LicenseNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(JobError::ProjectNotFound(3).is_user_error());
        assert!(JobError::MissingLicense { project_id: 3 }.is_user_error());
        assert!(!JobError::TaskVanished { project_id: 1, task_id: 2 }.is_user_error());
        assert!(!JobError::Storage(anyhow::anyhow!("disk I/O error")).is_user_error());
    }

    #[test]
    fn test_messages() {
        let err = JobError::InputNotFound { path: PathBuf::from("/tmp/missing.geojson") };
        assert_eq!(err.to_string(), "Dataset file not found: /tmp/missing.geojson");
        assert_eq!(JobError::ProjectNotFound(7).to_string(), "Project 7 not found");
    }
}
