use crate::domain::scheduling_model::resource::worker::Worker;
use crate::domain::scheduling_model::schedule::schedule::Schedule;
use crate::domain::scheduling_model::schedule::schedule_builder::ScheduleBuilder;
use crate::domain::scheduling_model::scheduler::workflow_scheduler::WorkflowScheduler;
use crate::domain::scheduling_model::scheduler::workflow_scheduler_type::WorkflowSchedulerType;
use crate::domain::scheduling_model::workflow::workflow::Workflow;
use crate::error::Result;

/**
 * Scheduler using the HEFT (Heterogeneous Earliest Finish Time) algorithm.
 *
 * A list scheduler using the upward rank (the length of the critical path from a task
 * to the exit) as sorting criterion. Each task is placed on the worker providing the
 * earliest finishing time (EFT), filling idle gaps of a worker where the task fits.
 */
#[derive(Debug, Clone, Copy)]
pub struct HeftWorkflowScheduler {
    pub include_transfer_times: bool,
}

impl HeftWorkflowScheduler {
    pub fn new(include_transfer_times: bool) -> Self {
        HeftWorkflowScheduler { include_transfer_times }
    }
}

/// Task positions by descending upward rank.
///
/// Equal ranks are ordered by topological position, which keeps the order reproducible and
/// places a predecessor before a successor of the same rank (zero cost edges).
pub fn priority_order(upward_rank: &[f64], topological_order: &[usize]) -> Vec<usize> {
    let mut topological_position = vec![0; upward_rank.len()];
    for (position, &task) in topological_order.iter().enumerate() {
        topological_position[task] = position;
    }

    let mut priority: Vec<usize> = topological_order.to_vec();
    priority.sort_by(|a, b| upward_rank[*b].total_cmp(&upward_rank[*a]).then(topological_position[*a].cmp(&topological_position[*b])));
    priority
}

impl WorkflowScheduler for HeftWorkflowScheduler {
    fn scheduler_type(&self) -> WorkflowSchedulerType {
        WorkflowSchedulerType::Heft
    }

    fn schedule(&self, workflow: &Workflow, workers: &[Worker]) -> Result<Schedule> {
        let order = workflow.topological_order()?;
        let ranks = workflow.calculate_upward_rank(self.include_transfer_times)?;
        let priority = priority_order(&ranks, &order);

        let mut builder = ScheduleBuilder::new(workflow, workers, self.include_transfer_times)?;
        let all_workers: Vec<usize> = (0..builder.worker_count()).collect();

        builder.schedule_in_passes(WorkflowSchedulerType::Heft, &priority, true, |_| all_workers.clone())?;
        builder.build(WorkflowSchedulerType::Heft)
    }
}

pub fn schedule_heft(workflow: &Workflow, workers: &[Worker], include_transfer_times: bool) -> Result<Schedule> {
    HeftWorkflowScheduler::new(include_transfer_times).schedule(workflow, workers)
}
