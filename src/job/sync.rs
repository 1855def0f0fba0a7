use rusqlite::Connection;
use crate::error::JobError;
use crate::job::loader::LoadedDataset;
use crate::models::Dataset;
use crate::repo::{DatasetRepo, LicenseRepo};

/// Result of reconciling a loaded document with the stored dataset
#[derive(Debug)]
pub enum SyncOutcome {
    /// Stored checksum matches; nothing further should happen.
    Unchanged(Dataset),
    Updated(Dataset),
    Created(Dataset),
}

/// Bring the project's dataset in line with the loaded document.
///
/// `license_id` is only consulted when the dataset does not exist yet.
/// Writes go through `conn`; committing is the caller's job.
pub fn sync_dataset(
    conn: &Connection,
    project_id: i64,
    loaded: &LoadedDataset,
    license_id: Option<i64>,
) -> Result<SyncOutcome, JobError> {
    if let Some(mut dataset) = DatasetRepo::get_by_project(conn, project_id)? {
        if dataset.checksum == loaded.checksum {
            log::info!("Dataset {:?} of project {} unchanged", dataset.id, project_id);
            return Ok(SyncOutcome::Unchanged(dataset));
        }
        DatasetRepo::update_content(conn, &mut dataset, &loaded.content, &loaded.checksum)?;
        log::info!("Updated dataset {:?} of project {}", dataset.id, project_id);
        return Ok(SyncOutcome::Updated(dataset));
    }

    let license_id = license_id.ok_or(JobError::MissingLicense { project_id })?;
    if LicenseRepo::get_by_id(conn, license_id)?.is_none() {
        return Err(JobError::LicenseNotFound(license_id));
    }

    let dataset = DatasetRepo::create(
        conn,
        project_id,
        &loaded.name(),
        license_id,
        &loaded.content,
        &loaded.checksum,
    )?;
    log::info!("Created dataset {:?} for project {}", dataset.id, project_id);
    Ok(SyncOutcome::Created(dataset))
}
