use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::scheduling_model::utils::id::TaskId;

/// CPM figures of a single task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTiming {
    pub earliest_start: f64,
    pub earliest_finish: f64,
    pub latest_start: f64,
    pub latest_finish: f64,
    pub slack: f64,
    pub is_on_critical_path: bool,
}

/// Result of one critical path analysis.
///
/// Criticality lives here, keyed by task id, and never on the tasks themselves. Analysing the
/// same workflow twice (e.g. with and without transfer times) therefore cannot interfere.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalPathResult {
    pub include_transfer_times: bool,
    pub timings: HashMap<TaskId, TaskTiming>,

    /// One connected critical chain from a source to a sink. If several equally long
    /// chains exist only one of them is returned.
    pub ordered_critical_path: Vec<TaskId>,

    /// Maximum earliest finish over all tasks.
    pub minimum_project_duration: f64,

    /// Bound used for the backward pass (the deadline, if one was given).
    pub horizon: f64,

    /// Tasks whose latest start lies before their earliest start, i.e. the horizon is infeasible.
    pub negative_slack_tasks: Vec<TaskId>,
}

impl CriticalPathResult {
    pub fn timing(&self, task_id: &TaskId) -> Option<&TaskTiming> {
        self.timings.get(task_id)
    }

    pub fn is_critical(&self, task_id: &TaskId) -> bool {
        self.timings.get(task_id).is_some_and(|timing| timing.is_on_critical_path)
    }

    /// Every task with the least slack (zero unless a deadline shifts it). May contain more tasks
    /// than `ordered_critical_path`.
    pub fn critical_tasks(&self) -> HashSet<TaskId> {
        self.timings.iter().filter(|(_, timing)| timing.is_on_critical_path).map(|(id, _)| id.clone()).collect()
    }

    /// `false` if any task ended up with negative slack.
    pub fn is_feasible(&self) -> bool {
        self.negative_slack_tasks.is_empty()
    }

    /// Span of the ordered critical path: earliest finish of its last task minus earliest
    /// start of its first task.
    pub fn critical_path_duration(&self) -> f64 {
        match (self.ordered_critical_path.first(), self.ordered_critical_path.last()) {
            (Some(first), Some(last)) => self.timings[last].earliest_finish - self.timings[first].earliest_start,
            _ => 0.0,
        }
    }
}
