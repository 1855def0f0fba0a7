use serde::{Deserialize, Serialize};

/// Project-scoped GeoJSON dataset
///
/// `data` holds the raw document exactly as it was read from disk, and
/// `checksum` is the digest of that raw text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub id: Option<i64>,
    pub project_id: i64,
    pub name: String,
    pub license_id: i64,
    pub data: String,
    pub checksum: String,
    pub created_ts: i64,
    pub modified_ts: i64,
}
