use clap::Parser;
use std::path::PathBuf;
use crate::config::Settings;
use crate::db::DbConnection;
use crate::job::{generate, JobOutcome, JobRequest};
use crate::cli::error::{user_error, validate_project_id};
use crate::cli::output::{format_report, UNCHANGED_NOTICE};
use anyhow::Result;

#[derive(Parser)]
#[command(name = "datalayers")]
#[command(about = "Assign a project's GeoJSON dataset features to its task cells and refresh per-task data layers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Project ID
    pub project: String,
    /// Path to a GeoJSON FeatureCollection (WGS84)
    pub dataset: PathBuf,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let project_id = match validate_project_id(&cli.project) {
        Ok(id) => id,
        Err(e) => user_error(&e),
    };

    let settings = Settings::load()?;
    let conn = DbConnection::connect(&settings)?;

    let request = JobRequest {
        project_id,
        path: cli.dataset,
        license_id: settings.default_license,
    };

    match generate(&conn, &request)? {
        JobOutcome::Unchanged => println!("{}", UNCHANGED_NOTICE),
        JobOutcome::Applied(report) => println!("{}", format_report(project_id, &report)),
    }

    Ok(())
}
