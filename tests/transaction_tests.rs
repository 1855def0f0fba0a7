// All-or-nothing behavior of a run
// A failure anywhere after loading must leave the database as it was

use test_env::*;
use datalayers::error::JobError;
use datalayers::job::{generate, JobOutcome, JobRequest};
use datalayers::repo::{DatasetRepo, TaskRepo};
use datalayers::utils::compute_checksum;

fn request(project_id: i64, file: std::path::PathBuf, license_id: Option<i64>) -> JobRequest {
    JobRequest { project_id, path: file, license_id }
}

#[test]
fn test_malformed_update_keeps_previous_dataset() {
    let env = TestEnv::new();
    let project_id = three_cell_project(&env);
    let good = env.dataset_file("good.geojson", SPLIT_2_3_0);
    let bad = env.dataset_file("bad.geojson", r#"{"type": "FeatureCollection", "features": 7}"#);

    let outcome = generate(env.db(), &request(project_id, good, Some(env.license_id))).unwrap();
    assert!(matches!(outcome, JobOutcome::Applied(_)));

    let err = generate(env.db(), &request(project_id, bad, Some(env.license_id))).unwrap_err();
    assert!(matches!(err, JobError::Parse { .. }));
    assert!(err.is_user_error());

    let dataset = DatasetRepo::get_by_project(env.db(), project_id).unwrap().unwrap();
    assert_eq!(dataset.checksum, compute_checksum(SPLIT_2_3_0));
    assert_eq!(dataset.data, SPLIT_2_3_0);
    assert_eq!(env.count("task_states"), 3);
}

#[test]
fn test_missing_license_writes_nothing() {
    let env = TestEnv::new();
    let project_id = three_cell_project(&env);
    let file = env.dataset_file("buildings.geojson", SPLIT_2_3_0);

    let err = generate(env.db(), &request(project_id, file, None)).unwrap_err();
    assert!(matches!(err, JobError::MissingLicense { .. }));

    assert_eq!(env.count("datasets"), 0);
    assert_eq!(env.count("task_data"), 0);
}

#[test]
fn test_unknown_license_writes_nothing() {
    let env = TestEnv::new();
    let project_id = three_cell_project(&env);
    let file = env.dataset_file("buildings.geojson", SPLIT_2_3_0);

    let err = generate(env.db(), &request(project_id, file, Some(999))).unwrap_err();
    assert!(matches!(err, JobError::LicenseNotFound(999)));
    assert_eq!(env.count("datasets"), 0);
}

#[test]
fn test_vanished_task_rolls_back_everything() {
    let env = TestEnv::new();
    let project_id = three_cell_project(&env);
    let file = env.dataset_file("buildings.geojson", SPLIT_2_3_0);

    // Simulate a concurrent delete of task 3 after the task list was read
    env.db()
        .execute_batch(
            "CREATE TRIGGER vanish AFTER INSERT ON task_data WHEN NEW.task_id = 1
             BEGIN
                 DELETE FROM tasks WHERE project_id = NEW.project_id AND id = 3;
             END;",
        )
        .unwrap();

    let err = generate(env.db(), &request(project_id, file, Some(env.license_id))).unwrap_err();
    match err {
        JobError::TaskVanished { project_id: p, task_id } => {
            assert_eq!(p, project_id);
            assert_eq!(task_id, 3);
        }
        other => panic!("unexpected error: {}", other),
    }

    assert_eq!(env.count("datasets"), 0);
    assert_eq!(env.count("task_data"), 0);
    assert_eq!(env.count("task_states"), 0);
    // The delete was part of the rolled back transaction too
    assert!(TaskRepo::get(env.db(), project_id, 3).unwrap().is_some());
}

#[test]
fn test_spatial_error_is_internal_and_rolls_back() {
    let env = TestEnv::new();
    let project_id = three_cell_project(&env);
    env.db()
        .execute(
            "INSERT INTO tasks (project_id, id, geometry, created_ts)
             VALUES (?1, 4, 'SRID=3857;POLYGON((0 0,1 0,1 1,0 1,0 0))', 0)",
            [project_id],
        )
        .unwrap();
    let file = env.dataset_file("buildings.geojson", SPLIT_2_3_0);

    let err = generate(env.db(), &request(project_id, file, Some(env.license_id))).unwrap_err();
    assert!(matches!(err, JobError::Storage(_)));
    assert!(!err.is_user_error());

    assert_eq!(env.count("datasets"), 0);
    assert_eq!(env.count("task_data"), 0);
}

#[test]
fn test_connection_usable_after_rollback() {
    let env = TestEnv::new();
    let project_id = three_cell_project(&env);
    let bad = env.dataset_file("bad.geojson", "not json");
    let good = env.dataset_file("good.geojson", SPLIT_2_3_0);

    assert!(generate(env.db(), &request(project_id, bad, Some(env.license_id))).is_err());
    let outcome = generate(env.db(), &request(project_id, good, Some(env.license_id))).unwrap();
    assert!(matches!(outcome, JobOutcome::Applied(_)));
    assert_eq!(env.count("task_data"), 3);
}
