use predicates::prelude::*;
use test_env::*;

#[test]
fn test_first_run_prints_report() {
    let env = TestEnv::new();
    let project_id = three_cell_project(&env);
    let file = env.dataset_file("buildings.geojson", SPLIT_2_3_0);

    env.cmd()
        .arg(project_id.to_string())
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Created dataset 1 for project {}: 5 features, 0 outside every task", project_id)))
        .stdout(predicate::str::contains("Task 1: created (2 features) -> ready"))
        .stdout(predicate::str::contains("Task 2: created (3 features) -> ready"))
        .stdout(predicate::str::contains("Task 3: created (0 features) -> validated"))
        .stdout(predicate::str::contains("3 of 3 task layers changed"));

    assert_eq!(env.count("datasets"), 1);
    assert_eq!(env.count("task_data"), 3);
    assert_eq!(env.count("task_states"), 3);
}

#[test]
fn test_second_run_reports_unchanged() {
    let env = TestEnv::new();
    let project_id = three_cell_project(&env);
    let file = env.dataset_file("buildings.geojson", SPLIT_2_3_0);

    env.cmd().arg(project_id.to_string()).arg(&file).assert().success();

    env.cmd()
        .arg(project_id.to_string())
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::diff("Dataset unchanged.  Quit now.\n"));

    assert_eq!(env.count("task_data"), 3);
    assert_eq!(env.count("task_states"), 3);
}

#[test]
fn test_changed_dataset_reports_updates() {
    let env = TestEnv::new();
    let project_id = three_cell_project(&env);
    let first = env.dataset_file("v1.geojson", SPLIT_2_3_0);
    let second = env.dataset_file("v2.geojson", SPLIT_1_3_1);

    env.cmd().arg(project_id.to_string()).arg(&first).assert().success();

    env.cmd()
        .arg(project_id.to_string())
        .arg(&second)
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated dataset 1"))
        .stdout(predicate::str::contains("Task 1: updated (1 feature) -> ready"))
        .stdout(predicate::str::contains("Task 2: unchanged (3 features)"))
        .stdout(predicate::str::contains("Task 3: updated (1 feature) -> ready"))
        .stdout(predicate::str::contains("2 of 3 task layers changed"));

    assert_eq!(env.count("task_states"), 5);
}

// ============================================================================
// User errors (exit code 1)
// ============================================================================

#[test]
fn test_missing_file() {
    let env = TestEnv::new();
    let project_id = three_cell_project(&env);

    env.cmd()
        .arg(project_id.to_string())
        .arg(env.path().join("nope.geojson"))
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("not found"));

    assert_eq!(env.count("datasets"), 0);
}

#[test]
fn test_malformed_geojson() {
    let env = TestEnv::new();
    let project_id = three_cell_project(&env);
    let file = env.dataset_file("broken.geojson", r#"{"type": "FeatureCollection", "features": [{"#);

    env.cmd()
        .arg(project_id.to_string())
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid GeoJSON"));

    assert_eq!(env.count("datasets"), 0);
    assert_eq!(env.count("task_data"), 0);
}

#[test]
fn test_wrong_top_level_type() {
    let env = TestEnv::new();
    let project_id = three_cell_project(&env);
    let file = env.dataset_file(
        "point.geojson",
        r#"{"type": "Point", "coordinates": [0.5, 0.5]}"#,
    );

    env.cmd()
        .arg(project_id.to_string())
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid GeoJSON"));
}

#[test]
fn test_unknown_project() {
    let env = TestEnv::new();
    let file = env.dataset_file("buildings.geojson", SPLIT_2_3_0);

    env.cmd()
        .arg("99")
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Project 99 not found"));
}

#[test]
fn test_invalid_project_id() {
    let env = TestEnv::new();
    let file = env.dataset_file("buildings.geojson", SPLIT_2_3_0);

    env.cmd()
        .arg("abc")
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid project ID"));
}

#[test]
fn test_missing_arguments() {
    let env = TestEnv::new();

    // clap reports usage errors itself
    env.cmd().arg("1").assert().failure();
}

#[test]
fn test_missing_license_for_new_dataset() {
    let env = TestEnv::without_license();
    let project_id = three_cell_project(&env);
    let file = env.dataset_file("buildings.geojson", SPLIT_2_3_0);

    env.cmd()
        .arg(project_id.to_string())
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No license configured"));

    assert_eq!(env.count("datasets"), 0);
}

// ============================================================================
// Internal errors (exit code 2)
// ============================================================================

#[test]
fn test_spatial_failure_is_internal() {
    let env = TestEnv::new();
    let project_id = env.project("Projected");
    env.db()
        .execute(
            "INSERT INTO tasks (project_id, id, geometry, created_ts)
             VALUES (?1, 1, 'SRID=3857;POLYGON((0 0,1 0,1 1,0 1,0 0))', 0)",
            [project_id],
        )
        .unwrap();
    let file = env.dataset_file("buildings.geojson", SPLIT_2_3_0);

    env.cmd()
        .arg(project_id.to_string())
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Internal error"));

    assert_eq!(env.count("datasets"), 0);
    assert_eq!(env.count("task_data"), 0);
    assert_eq!(env.count("task_states"), 0);
}
