// Core data models for datalayers
// These structs represent the domain entities

pub mod project;
pub mod license;
pub mod dataset;
pub mod task;
pub mod task_data;

pub use project::*;
pub use license::*;
pub use dataset::*;
pub use task::*;
pub use task_data::*;
