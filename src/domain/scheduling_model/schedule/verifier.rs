use std::collections::HashMap;

use crate::domain::scheduling_model::critical_path::TIME_EPSILON;
use crate::domain::scheduling_model::schedule::schedule::{Schedule, ScheduledTask};
use crate::domain::scheduling_model::utils::id::TaskId;
use crate::domain::scheduling_model::workflow::workflow::Workflow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Task starts before its dependency finished (plus transfer time across workers).
    DependencyOrder,
    /// A dependency of a scheduled task was never scheduled.
    MissingDependency,
    /// `end_time - start_time` differs from the execution time.
    DurationMismatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub task: TaskId,

    /// The predecessor involved, `None` for duration mismatches.
    pub dependency: Option<TaskId>,

    pub required_start: f64,
    pub actual_start: f64,
}

/// Result of a schedule check. Violations are reported, never fixed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationReport {
    pub violations: Vec<Violation>,
}

impl VerificationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }
}

/// Checks every dependency edge into every scheduled task.
///
/// Required start is `dependency.end_time + transfer_time` across workers and
/// `dependency.end_time` on the same worker (transfers are ignored if
/// `include_transfer_times` is false). A start up to `TIME_EPSILON` early is accepted.
/// Each violation is logged as a warning; the caller decides whether it is fatal.
pub fn verify_scheduled_tasks(scheduled_tasks: &[ScheduledTask], workflow: &Workflow, include_transfer_times: bool) -> VerificationReport {
    let by_task: HashMap<&TaskId, &ScheduledTask> = scheduled_tasks.iter().map(|scheduled| (&scheduled.node_id, scheduled)).collect();
    let mut violations = Vec::new();

    for scheduled in scheduled_tasks {
        let Some(position) = workflow.index_of(&scheduled.node_id) else {
            log::warn!("Scheduled task '{}' is not part of workflow '{}'.", scheduled.node_id, workflow.id);
            continue;
        };
        let task = workflow.task_at(position);

        let duration = scheduled.end_time - scheduled.start_time;
        if (duration - task.execution_time).abs() >= TIME_EPSILON {
            violations.push(Violation {
                kind: ViolationKind::DurationMismatch,
                task: task.id.clone(),
                dependency: None,
                required_start: scheduled.start_time,
                actual_start: scheduled.start_time,
            });
        }

        for edge in workflow.predecessors(position) {
            let dependency_id = &workflow.task_at(edge.task).id;

            let Some(dependency) = by_task.get(dependency_id) else {
                violations.push(Violation {
                    kind: ViolationKind::MissingDependency,
                    task: task.id.clone(),
                    dependency: Some(dependency_id.clone()),
                    required_start: f64::INFINITY,
                    actual_start: scheduled.start_time,
                });
                continue;
            };

            let transfer = if include_transfer_times && dependency.worker_id != scheduled.worker_id { edge.transfer_time } else { 0.0 };
            let required_start = dependency.end_time + transfer;

            if scheduled.start_time < required_start - TIME_EPSILON {
                violations.push(Violation {
                    kind: ViolationKind::DependencyOrder,
                    task: task.id.clone(),
                    dependency: Some(dependency_id.clone()),
                    required_start,
                    actual_start: scheduled.start_time,
                });
            }
        }
    }

    for violation in &violations {
        log::warn!(
            "Schedule violation ({:?}) on task '{}' (dependency: {}): required start {}, actual start {}.",
            violation.kind,
            violation.task,
            violation.dependency.as_ref().map(|id| id.as_str()).unwrap_or("-"),
            violation.required_start,
            violation.actual_start
        );
    }

    VerificationReport { violations }
}

/// Re-checks a finished schedule.
pub fn verify_schedule(schedule: &Schedule, workflow: &Workflow, include_transfer_times: bool) -> VerificationReport {
    verify_scheduled_tasks(&schedule.scheduled_tasks, workflow, include_transfer_times)
}
