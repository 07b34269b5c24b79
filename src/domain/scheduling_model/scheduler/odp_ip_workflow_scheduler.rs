use crate::domain::scheduling_model::coalition::coalition_solver::{CoalitionSolver, solve_coalition_structure};
use crate::domain::scheduling_model::coalition::partition_schedule::apply_partition_schedule;
use crate::domain::scheduling_model::coalition::subset_values::build_subset_values;
use crate::domain::scheduling_model::resource::worker::Worker;
use crate::domain::scheduling_model::schedule::schedule::Schedule;
use crate::domain::scheduling_model::scheduler::workflow_scheduler::WorkflowScheduler;
use crate::domain::scheduling_model::scheduler::workflow_scheduler_type::WorkflowSchedulerType;
use crate::domain::scheduling_model::workflow::workflow::Workflow;
use crate::error::Result;

/**
 * Coalition based scheduling.
 *
 * The non-critical tasks are grouped by a coalition structure solver so that every group
 * fills one worker without outlasting the critical path; the critical path itself gets a
 * worker of its own. The solver only sees the subset value table.
 */
#[derive(Debug)]
pub struct OdpIpWorkflowScheduler {
    pub include_transfer_times: bool,
    solver: Box<dyn CoalitionSolver>,
}

impl OdpIpWorkflowScheduler {
    pub fn new(include_transfer_times: bool, solver: Box<dyn CoalitionSolver>) -> Self {
        OdpIpWorkflowScheduler { include_transfer_times, solver }
    }
}

impl WorkflowScheduler for OdpIpWorkflowScheduler {
    fn scheduler_type(&self) -> WorkflowSchedulerType {
        WorkflowSchedulerType::OdpIp
    }

    fn schedule(&self, workflow: &Workflow, workers: &[Worker]) -> Result<Schedule> {
        let subset_values = build_subset_values(workflow)?;
        let partition = solve_coalition_structure(self.solver.as_ref(), &subset_values)?;

        log::info!(
            "Workflow '{}': {} critical task(s), {} non-critical task(s) in {} coalition(s).",
            workflow.id,
            subset_values.critical_tasks.len(),
            subset_values.num_agents(),
            partition.len()
        );

        apply_partition_schedule(workflow, &partition, workers, self.include_transfer_times)
    }
}
