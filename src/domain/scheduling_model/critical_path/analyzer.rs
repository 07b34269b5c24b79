use std::collections::HashMap;

use crate::domain::scheduling_model::critical_path::TIME_EPSILON;
use crate::domain::scheduling_model::critical_path::critical_path_result::{CriticalPathResult, TaskTiming};
use crate::domain::scheduling_model::utils::id::TaskId;
use crate::domain::scheduling_model::workflow::workflow::Workflow;
use crate::error::Result;

/// Latest finish assigned to tasks without successors in the backward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkBound {
    /// A sink must finish at its own earliest finish. Every sink therefore has zero slack,
    /// including sinks of short side branches.
    #[default]
    OwnFinish,

    /// Classic CPM: every sink may finish as late as the horizon.
    ProjectHorizon,
}

/// Critical Path Method over a workflow.
///
/// Forward pass for earliest start/finish, backward pass for latest start/finish, slack as
/// the difference. Transfer times count on every edge if `include_transfer_times` is set;
/// without them the result is the theoretical lower bound of the workflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalPathAnalyzer {
    pub include_transfer_times: bool,

    /// Optional project deadline used as horizon instead of the minimum project duration.
    /// A deadline shorter than the critical path shows up as negative slack.
    pub deadline: Option<f64>,

    /// Ignored if a deadline is set; sinks are then bound by the deadline.
    pub sink_bound: SinkBound,
}

impl CriticalPathAnalyzer {
    pub fn new(include_transfer_times: bool) -> Self {
        CriticalPathAnalyzer { include_transfer_times, deadline: None, sink_bound: SinkBound::default() }
    }

    pub fn with_sink_bound(mut self, sink_bound: SinkBound) -> Self {
        self.sink_bound = sink_bound;
        self
    }

    pub fn with_deadline(mut self, deadline: f64) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn transfer(&self, transfer_time: f64) -> f64 {
        if self.include_transfer_times { transfer_time } else { 0.0 }
    }

    pub fn analyze(&self, workflow: &Workflow) -> Result<CriticalPathResult> {
        let order = workflow.topological_order()?;
        let n = workflow.len();

        // Forward pass
        let mut earliest_start = vec![0.0; n];
        let mut earliest_finish = vec![0.0; n];
        for &task in &order {
            earliest_start[task] = workflow
                .predecessors(task)
                .iter()
                .map(|edge| earliest_finish[edge.task] + self.transfer(edge.transfer_time))
                .fold(0.0, f64::max);
            earliest_finish[task] = earliest_start[task] + workflow.task_at(task).execution_time;
        }

        let minimum_project_duration = earliest_finish.iter().copied().fold(0.0, f64::max);
        let horizon = self.deadline.unwrap_or(minimum_project_duration);

        // Backward pass. Sinks are bound by the deadline or the sink bound, everything else
        // by the horizon and its successors.
        let mut latest_start = vec![0.0; n];
        let mut latest_finish = vec![horizon; n];
        for &task in order.iter().rev() {
            let successors = workflow.successors(task);
            latest_finish[task] = if successors.is_empty() {
                match (self.deadline, self.sink_bound) {
                    (Some(deadline), _) => deadline,
                    (None, SinkBound::OwnFinish) => earliest_finish[task],
                    (None, SinkBound::ProjectHorizon) => horizon,
                }
            } else {
                successors.iter().map(|edge| latest_start[edge.task] - self.transfer(edge.transfer_time)).fold(horizon, f64::min)
            };
            latest_start[task] = latest_finish[task] - workflow.task_at(task).execution_time;
        }

        // Critical means least slack. Without a deadline that is zero; with one it is shifted by
        // `deadline - minimum_project_duration`, possibly below zero.
        let slacks: Vec<f64> = (0..n).map(|task| latest_start[task] - earliest_start[task]).collect();
        let minimum_slack = slacks.iter().copied().fold(f64::INFINITY, f64::min);

        let mut timings = HashMap::with_capacity(n);
        let mut negative_slack_tasks = Vec::new();
        let mut critical = vec![false; n];

        for task in 0..n {
            let slack = slacks[task];
            critical[task] = slack - minimum_slack < TIME_EPSILON;

            let task_id = &workflow.task_at(task).id;
            if slack <= -TIME_EPSILON {
                negative_slack_tasks.push(task_id.clone());
            }

            timings.insert(
                task_id.clone(),
                TaskTiming {
                    earliest_start: earliest_start[task],
                    earliest_finish: earliest_finish[task],
                    latest_start: latest_start[task],
                    latest_finish: latest_finish[task],
                    slack,
                    is_on_critical_path: critical[task],
                },
            );
        }

        if !negative_slack_tasks.is_empty() {
            log::warn!(
                "Horizon {} of workflow '{}' is shorter than its critical path ({}). {} task(s) have negative slack.",
                horizon,
                workflow.id,
                minimum_project_duration,
                negative_slack_tasks.len()
            );
        }

        let ordered_path = self.ordered_critical_path(workflow, &order, &critical, &earliest_start, &earliest_finish, minimum_project_duration);
        let ordered_critical_path: Vec<TaskId> = ordered_path.into_iter().map(|task| workflow.task_at(task).id.clone()).collect();

        log::debug!(
            "Critical path of workflow '{}' (transfers {}): {:?}, duration {}.",
            workflow.id,
            if self.include_transfer_times { "included" } else { "excluded" },
            ordered_critical_path.iter().map(|id| id.as_str()).collect::<Vec<_>>(),
            minimum_project_duration
        );

        Ok(CriticalPathResult {
            include_transfer_times: self.include_transfer_times,
            timings,
            ordered_critical_path,
            minimum_project_duration,
            horizon,
            negative_slack_tasks,
        })
    }

    /// Walks tight edges (`earliest_finish(u) + transfer == earliest_start(v)`) between critical
    /// tasks and returns one chain.
    ///
    /// Start candidates are critical tasks without a critical predecessor, by earliest start and
    /// then topological position; if there is none, the critical task with the smallest
    /// earliest start. The first candidate whose chain reaches the minimum project duration
    /// wins, otherwise the chain that reaches furthest.
    fn ordered_critical_path(
        &self,
        workflow: &Workflow,
        order: &[usize],
        critical: &[bool],
        earliest_start: &[f64],
        earliest_finish: &[f64],
        minimum_project_duration: f64,
    ) -> Vec<usize> {
        let n = workflow.len();
        let mut topological_position = vec![0; n];
        for (position, &task) in order.iter().enumerate() {
            topological_position[task] = position;
        }

        // Furthest reachable finish and the successor leading there, per critical task.
        let mut best_end = earliest_finish.to_vec();
        let mut next: Vec<Option<usize>> = vec![None; n];
        for &task in order.iter().rev() {
            if !critical[task] {
                continue;
            }
            for edge in workflow.successors(task) {
                let successor = edge.task;
                let is_tight = (earliest_finish[task] + self.transfer(edge.transfer_time) - earliest_start[successor]).abs() < TIME_EPSILON;
                if critical[successor] && is_tight && best_end[successor] > best_end[task] + TIME_EPSILON / 2.0 {
                    best_end[task] = best_end[successor];
                    next[task] = Some(successor);
                }
            }
        }

        let by_start = |a: &usize, b: &usize| {
            earliest_start[*a].total_cmp(&earliest_start[*b]).then(topological_position[*a].cmp(&topological_position[*b]))
        };

        let mut candidates: Vec<usize> =
            (0..n).filter(|task| critical[*task] && !workflow.predecessors(*task).iter().any(|edge| critical[edge.task])).collect();
        if candidates.is_empty() {
            candidates.extend((0..n).filter(|task| critical[*task]).min_by(by_start));
        }
        candidates.sort_by(by_start);

        let start = candidates
            .iter()
            .copied()
            .find(|task| (best_end[*task] - minimum_project_duration).abs() < TIME_EPSILON)
            .or_else(|| candidates.iter().copied().max_by(|a, b| best_end[*a].total_cmp(&best_end[*b]).then(by_start(b, a))));

        let mut path = Vec::new();
        let mut current = start;
        while let Some(task) = current {
            path.push(task);
            current = next[task];
        }
        path
    }
}

/// Analyzes `workflow` with the given transfer time policy.
pub fn analyze_critical_path(workflow: &Workflow, include_transfer_times: bool) -> Result<CriticalPathResult> {
    CriticalPathAnalyzer::new(include_transfer_times).analyze(workflow)
}

/// Minimum duration of the workflow on unlimited workers with free communication.
/// Lower bound for every schedule; used for efficiency ratios.
pub fn theoretical_minimum_duration(workflow: &Workflow) -> Result<f64> {
    Ok(analyze_critical_path(workflow, false)?.minimum_project_duration)
}
