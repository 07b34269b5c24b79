use std::collections::HashSet;

use crate::api::schedule_dto::schedule_dto::{ScheduleDto, ScheduledTaskDto};
use crate::domain::scheduling_model::resource::worker::Worker;
use crate::domain::scheduling_model::schedule::verifier::VerificationReport;
use crate::domain::scheduling_model::scheduler::workflow_scheduler_type::WorkflowSchedulerType;
use crate::domain::scheduling_model::utils::id::{TaskId, WorkerId};

/// Placement of one task.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTask {
    pub node_id: TaskId,
    pub start_time: f64,
    /// `start_time + execution_time`
    pub end_time: f64,
    pub worker_id: WorkerId,
}

/// Output of a scheduler: every task placed on a worker, the final worker states and the
/// result of the dependency check that ran on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub algorithm: WorkflowSchedulerType,

    /// In the order the scheduler placed them.
    pub scheduled_tasks: Vec<ScheduledTask>,

    pub workers: Vec<Worker>,
    pub verification: VerificationReport,
}

impl Schedule {
    pub fn get(&self, task_id: &TaskId) -> Option<&ScheduledTask> {
        self.scheduled_tasks.iter().find(|scheduled| &scheduled.node_id == task_id)
    }

    pub fn worker_of(&self, task_id: &TaskId) -> Option<&WorkerId> {
        self.get(task_id).map(|scheduled| &scheduled.worker_id)
    }

    /// Tasks on `worker_id`, ordered by start time.
    pub fn tasks_on(&self, worker_id: &WorkerId) -> Vec<&ScheduledTask> {
        let mut tasks: Vec<&ScheduledTask> = self.scheduled_tasks.iter().filter(|scheduled| &scheduled.worker_id == worker_id).collect();
        tasks.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        tasks
    }

    /// Time between the first start and the last finish.
    pub fn makespan(&self) -> f64 {
        if self.scheduled_tasks.is_empty() {
            return 0.0;
        }
        let first_start = self.scheduled_tasks.iter().map(|scheduled| scheduled.start_time).fold(f64::INFINITY, f64::min);
        let last_end = self.scheduled_tasks.iter().map(|scheduled| scheduled.end_time).fold(f64::NEG_INFINITY, f64::max);
        last_end - first_start
    }

    /// Number of workers with at least one task.
    pub fn used_workers(&self) -> usize {
        self.scheduled_tasks.iter().map(|scheduled| &scheduled.worker_id).collect::<HashSet<_>>().len()
    }

    pub fn is_valid(&self) -> bool {
        self.verification.is_valid()
    }

    pub fn to_dto(&self) -> ScheduleDto {
        ScheduleDto {
            algorithm: self.algorithm.to_string(),
            makespan: self.makespan(),
            scheduled_tasks: self
                .scheduled_tasks
                .iter()
                .map(|scheduled| ScheduledTaskDto {
                    node_id: scheduled.node_id.to_string(),
                    start_time: scheduled.start_time,
                    end_time: scheduled.end_time,
                    worker_id: scheduled.worker_id.to_string(),
                })
                .collect(),
            workers: self.workers.iter().map(|worker| worker.to_state_dto()).collect(),
            verification_violations: self.verification.violation_count(),
        }
    }
}
