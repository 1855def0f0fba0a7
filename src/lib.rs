//! datalayers - per-task data layers for a tasking-manager style mapping project
//!
//! Takes a project's GeoJSON dataset, works out which task cells contain
//! each feature, and keeps one derived FeatureCollection per task up to date.
//! Each task whose layer changes gets a new workflow state: `validated` when
//! it has no features, `ready` otherwise.
//!
//! This library provides:
//! - Database connection, migrations and the `ST_Contains` SQL function
//! - Data models and repositories for projects, datasets, tasks and layers
//! - A typed GeoJSON model and a WKT codec
//! - The generation job and its command-line front end
//!
//! # Example
//!
//! ```no_run
//! use datalayers::db::DbConnection;
//! use datalayers::job::{generate, JobOutcome, JobRequest};
//!
//! let conn = DbConnection::connect_in_memory().unwrap();
//! let request = JobRequest {
//!     project_id: 1,
//!     path: "buildings.geojson".into(),
//!     license_id: Some(1),
//! };
//! match generate(&conn, &request).unwrap() {
//!     JobOutcome::Unchanged => println!("nothing to do"),
//!     JobOutcome::Applied(report) => println!("{} layers changed", report.changed_tasks()),
//! }
//! ```

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod geojson;
pub mod job;
pub mod models;
pub mod repo;
pub mod spatial;
pub mod utils;
