// Error handling utilities for consistent error messages and exit codes

use std::process;
use crate::error::JobError;

/// Exit with a user error (exit code 1)
/// User errors are for invalid input, missing resources, etc.
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Whether an error returned from `run` is an internal failure (exit code 2)
/// rather than a user error (exit code 1).
pub fn is_internal(err: &anyhow::Error) -> bool {
    match err.downcast_ref::<JobError>() {
        Some(job_err) => !job_err.is_user_error(),
        None => err.chain().any(|cause| cause.is::<rusqlite::Error>()),
    }
}

/// Validate that a project ID is valid (positive integer)
pub fn validate_project_id(id_str: &str) -> Result<i64, String> {
    id_str.parse::<i64>()
        .map_err(|_| format!("Invalid project ID: '{}'. Project ID must be a number.", id_str))
        .and_then(|id| {
            if id > 0 {
                Ok(id)
            } else {
                Err(format!("Invalid project ID: {}. Project ID must be positive.", id))
            }
        })
}
