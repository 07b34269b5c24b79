use crate::domain::scheduling_model::critical_path::analyzer::CriticalPathAnalyzer;
use crate::domain::scheduling_model::resource::worker::{Worker, critical_path_worker_index};
use crate::domain::scheduling_model::schedule::schedule::Schedule;
use crate::domain::scheduling_model::schedule::schedule_builder::ScheduleBuilder;
use crate::domain::scheduling_model::scheduler::heft_workflow_scheduler::priority_order;
use crate::domain::scheduling_model::scheduler::workflow_scheduler::WorkflowScheduler;
use crate::domain::scheduling_model::scheduler::workflow_scheduler_type::WorkflowSchedulerType;
use crate::domain::scheduling_model::workflow::workflow::Workflow;
use crate::error::{Error, Result};

/// HEFT with a hard placement constraint: every zero slack task runs on the critical path
/// worker, everything else may go to any worker (including that one).
///
/// Tasks are placed in passes over the rank order, a task only once all of its predecessors
/// are placed. If the critical path worker is busy, a critical task still waits for it, even
/// when another worker would finish it earlier.
#[derive(Debug, Clone, Copy)]
pub struct CpHeftWorkflowScheduler {
    pub include_transfer_times: bool,
}

impl CpHeftWorkflowScheduler {
    pub fn new(include_transfer_times: bool) -> Self {
        CpHeftWorkflowScheduler { include_transfer_times }
    }
}

impl WorkflowScheduler for CpHeftWorkflowScheduler {
    fn scheduler_type(&self) -> WorkflowSchedulerType {
        WorkflowSchedulerType::CpHeft
    }

    fn schedule(&self, workflow: &Workflow, workers: &[Worker]) -> Result<Schedule> {
        let analysis = CriticalPathAnalyzer::new(self.include_transfer_times).analyze(workflow)?;
        let critical_path_worker = critical_path_worker_index(workers).ok_or(Error::NoWorkers)?;

        let order = workflow.topological_order()?;
        let ranks = workflow.calculate_upward_rank(self.include_transfer_times)?;
        let priority = priority_order(&ranks, &order);
        let critical: Vec<bool> = workflow.tasks().iter().map(|task| analysis.is_critical(&task.id)).collect();

        log::debug!(
            "CP-HEFT pins {} critical task(s) of workflow '{}' to worker '{}'.",
            critical.iter().filter(|is_critical| **is_critical).count(),
            workflow.id,
            workers[critical_path_worker].id
        );

        let mut builder = ScheduleBuilder::new(workflow, workers, self.include_transfer_times)?;
        let all_workers: Vec<usize> = (0..builder.worker_count()).collect();

        builder.schedule_in_passes(WorkflowSchedulerType::CpHeft, &priority, true, |task| {
            if critical[task] { vec![critical_path_worker] } else { all_workers.clone() }
        })?;
        builder.build(WorkflowSchedulerType::CpHeft)
    }
}

pub fn schedule_cp_heft(workflow: &Workflow, workers: &[Worker], include_transfer_times: bool) -> Result<Schedule> {
    CpHeftWorkflowScheduler::new(include_transfer_times).schedule(workflow, workers)
}
