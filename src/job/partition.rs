use std::collections::BTreeMap;
use rusqlite::Connection;
use crate::error::JobError;
use crate::geojson::Feature;
use crate::models::Task;
use crate::repo::TaskRepo;

/// Features assigned to each task, keyed by task id (ascending)
#[derive(Debug, Default)]
pub struct Partition {
    pub layers: BTreeMap<i64, Vec<Feature>>,
    /// Features no task contains (including those without geometry)
    pub unassigned: usize,
}

/// Assign every feature to each task of the project whose geometry
/// contains it.
///
/// Every task gets an entry, possibly empty. Features keep their input order
/// within each entry. A feature may land in several tasks when task
/// geometries overlap.
pub fn partition_features(
    conn: &Connection,
    project_id: i64,
    tasks: &[Task],
    features: &[Feature],
) -> Result<Partition, JobError> {
    let mut partition = Partition::default();
    for task in tasks {
        partition.layers.insert(task.id, Vec::new());
    }

    for (index, feature) in features.iter().enumerate() {
        let Some(geometry) = &feature.geometry else {
            log::debug!("Feature #{} has no geometry, skipped", index);
            partition.unassigned += 1;
            continue;
        };

        let task_ids = TaskRepo::ids_containing(conn, project_id, geometry)?;
        log::debug!("Feature #{} ({}) -> tasks {:?}", index, geometry.type_name(), task_ids);

        let mut assigned = false;
        for task_id in task_ids {
            // A task created after the task list was read is not part of this run
            if let Some(layer) = partition.layers.get_mut(&task_id) {
                layer.push(feature.clone());
                assigned = true;
            }
        }
        if !assigned {
            partition.unassigned += 1;
        }
    }

    log::info!(
        "Partitioned {} features over {} tasks ({} unassigned)",
        features.len(),
        partition.layers.len(),
        partition.unassigned
    );
    Ok(partition)
}
