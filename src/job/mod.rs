//! Data layer generation job
//!
//! One run takes a project's GeoJSON dataset through four stages:
//!
//! 1. [`loader`] reads the file and checksums it
//! 2. [`sync`] compares the checksum with the stored dataset and stops early
//!    when nothing changed
//! 3. [`partition`] asks the database which task cells contain each feature
//! 4. [`update`] writes each task's layer and appends its next state
//!
//! Everything after loading runs in a single transaction: a failure at any
//! point leaves the database as it was.

pub mod loader;
pub mod partition;
pub mod sync;
pub mod update;

pub use loader::*;
pub use partition::*;
pub use sync::*;
pub use update::*;

use std::path::PathBuf;
use rusqlite::Connection;
use crate::error::JobError;
use crate::geojson::FeatureCollection;
use crate::repo::{ProjectRepo, TaskRepo};

/// Parameters of one run
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub project_id: i64,
    pub path: PathBuf,
    /// License for the dataset if this run creates it
    pub license_id: Option<i64>,
}

/// Summary of an applied run
#[derive(Debug, Clone)]
pub struct JobReport {
    pub dataset_id: i64,
    pub dataset_created: bool,
    pub feature_count: usize,
    pub unassigned_features: usize,
    pub tasks: Vec<TaskUpdate>,
}

impl JobReport {
    /// Number of tasks whose layer was created or rewritten
    pub fn changed_tasks(&self) -> usize {
        self.tasks.iter().filter(|t| t.change != LayerChange::Unchanged).count()
    }
}

#[derive(Debug, Clone)]
pub enum JobOutcome {
    /// The stored dataset already has this checksum; nothing was written.
    Unchanged,
    Applied(JobReport),
}

/// Run the job against `conn`.
pub fn generate(conn: &Connection, request: &JobRequest) -> Result<JobOutcome, JobError> {
    let loaded = load(&request.path)?;

    if ProjectRepo::get_by_id(conn, request.project_id)?.is_none() {
        return Err(JobError::ProjectNotFound(request.project_id));
    }

    // Rolled back on drop unless committed below
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| JobError::Storage(anyhow::Error::new(e).context("Failed to begin transaction")))?;

    let (dataset, dataset_created) = match sync_dataset(&tx, request.project_id, &loaded, request.license_id)? {
        SyncOutcome::Unchanged(_) => return Ok(JobOutcome::Unchanged),
        SyncOutcome::Updated(dataset) => (dataset, false),
        SyncOutcome::Created(dataset) => (dataset, true),
    };
    let dataset_id = dataset
        .id
        .ok_or_else(|| JobError::Storage(anyhow::anyhow!("Dataset was saved without an id")))?;

    let collection = FeatureCollection::parse(&loaded.content).map_err(|source| JobError::Parse {
        path: loaded.path.clone(),
        source,
    })?;
    let feature_count = collection.len();

    let tasks = TaskRepo::list_by_project(&tx, request.project_id)?;
    let partition = partition_features(&tx, request.project_id, &tasks, &collection.features)?;

    let mut updates = Vec::with_capacity(partition.layers.len());
    for (task_id, features) in partition.layers {
        updates.push(update_task_layer(&tx, request.project_id, dataset_id, task_id, features)?);
    }

    tx.commit()
        .map_err(|e| JobError::Storage(anyhow::Error::new(e).context("Failed to commit data layers")))?;

    let report = JobReport {
        dataset_id,
        dataset_created,
        feature_count,
        unassigned_features: partition.unassigned,
        tasks: updates,
    };
    log::info!(
        "Committed dataset {} for project {}: {} of {} task layers changed",
        dataset_id,
        request.project_id,
        report.changed_tasks(),
        report.tasks.len()
    );
    Ok(JobOutcome::Applied(report))
}
