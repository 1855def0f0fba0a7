use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use crate::error::JobError;
use crate::utils::compute_checksum;

/// A dataset document read from disk, not yet parsed
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub path: PathBuf,
    pub content: String,
    pub checksum: String,
}

impl LoadedDataset {
    /// Dataset name derived from the file name, e.g. `buildings` for
    /// `/data/buildings.geojson`.
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "dataset".to_string())
    }
}

/// Read the whole document as UTF-8 text and checksum the raw bytes.
pub fn load(path: &Path) -> Result<LoadedDataset, JobError> {
    let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => JobError::InputNotFound { path: path.to_path_buf() },
        _ => JobError::InputUnreadable { path: path.to_path_buf(), source },
    })?;
    let checksum = compute_checksum(&content);
    log::info!("Loaded {} ({} bytes, checksum {})", path.display(), content.len(), checksum);

    Ok(LoadedDataset {
        path: path.to_path_buf(),
        content,
        checksum,
    })
}
