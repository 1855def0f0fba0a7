use sha2::{Digest, Sha256};

/// Change-detection digest of a text document (SHA-256, lowercase hex)
///
/// Only used to tell whether content changed between runs.
pub fn compute_checksum(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}
