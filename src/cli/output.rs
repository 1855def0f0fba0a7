// Output formatting for job results

use crate::job::{JobReport, TaskUpdate};

/// Printed when the stored dataset already matches the input file
pub const UNCHANGED_NOTICE: &str = "Dataset unchanged.  Quit now.";

/// One line per task, e.g. `Task 3: created (2 features) -> ready`
pub fn format_task_update(update: &TaskUpdate) -> String {
    let noun = if update.feature_count == 1 { "feature" } else { "features" };
    match update.state {
        Some(state) => format!(
            "Task {}: {} ({} {}) -> {}",
            update.task_id,
            update.change.as_str(),
            update.feature_count,
            noun,
            state.as_str()
        ),
        None => format!(
            "Task {}: {} ({} {})",
            update.task_id,
            update.change.as_str(),
            update.feature_count,
            noun
        ),
    }
}

/// Full run summary
pub fn format_report(project_id: i64, report: &JobReport) -> String {
    let mut lines = Vec::with_capacity(report.tasks.len() + 2);
    lines.push(format!(
        "{} dataset {} for project {}: {} features, {} outside every task",
        if report.dataset_created { "Created" } else { "Updated" },
        report.dataset_id,
        project_id,
        report.feature_count,
        report.unassigned_features
    ));
    for update in &report.tasks {
        lines.push(format_task_update(update));
    }
    lines.push(format!(
        "{} of {} task layers changed",
        report.changed_tasks(),
        report.tasks.len()
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::LayerChange;
    use crate::models::TaskStateKind;

    fn update(task_id: i64, feature_count: usize, change: LayerChange, state: Option<TaskStateKind>) -> TaskUpdate {
        TaskUpdate { task_id, feature_count, change, state }
    }

    #[test]
    fn test_format_task_update() {
        assert_eq!(
            format_task_update(&update(1, 2, LayerChange::Created, Some(TaskStateKind::Ready))),
            "Task 1: created (2 features) -> ready"
        );
        assert_eq!(
            format_task_update(&update(2, 1, LayerChange::Updated, Some(TaskStateKind::Ready))),
            "Task 2: updated (1 feature) -> ready"
        );
        assert_eq!(
            format_task_update(&update(3, 0, LayerChange::Unchanged, None)),
            "Task 3: unchanged (0 features)"
        );
    }

    #[test]
    fn test_format_report() {
        let report = JobReport {
            dataset_id: 4,
            dataset_created: true,
            feature_count: 3,
            unassigned_features: 1,
            tasks: vec![
                update(1, 2, LayerChange::Created, Some(TaskStateKind::Ready)),
                update(2, 0, LayerChange::Unchanged, None),
            ],
        };
        let text = format_report(9, &report);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Created dataset 4 for project 9: 3 features, 1 outside every task");
        assert_eq!(lines[1], "Task 1: created (2 features) -> ready");
        assert_eq!(lines[3], "1 of 2 task layers changed");
    }
}
