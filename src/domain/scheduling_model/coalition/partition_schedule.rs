use crate::domain::scheduling_model::coalition::coalition_solver::validate_partition;
use crate::domain::scheduling_model::coalition::subset_values::coalition_agents;
use crate::domain::scheduling_model::resource::worker::{Worker, critical_path_worker_index};
use crate::domain::scheduling_model::schedule::schedule::Schedule;
use crate::domain::scheduling_model::schedule::schedule_builder::ScheduleBuilder;
use crate::domain::scheduling_model::scheduler::heft_workflow_scheduler::priority_order;
use crate::domain::scheduling_model::scheduler::workflow_scheduler_type::WorkflowSchedulerType;
use crate::domain::scheduling_model::workflow::workflow::Workflow;
use crate::error::{Error, Result};

/// Schedules `workflow` with a fixed worker per task.
///
/// Critical tasks (same split as `build_subset_values`) run on the critical path worker.
/// Coalition `j` of `partition` (1-indexed agents, i.e. non-critical tasks in input order)
/// runs on the `j`-th of the remaining workers. Empty coalitions are skipped.
/// Start times come from a rank ordered list scheduling pass with gap insertion.
pub fn apply_partition_schedule(workflow: &Workflow, partition: &[Vec<usize>], workers: &[Worker], include_transfer_times: bool) -> Result<Schedule> {
    let agents = coalition_agents(workflow)?;
    validate_partition(partition, agents.non_critical.len())?;

    let coalitions: Vec<&Vec<usize>> = partition.iter().filter(|coalition| !coalition.is_empty()).collect();
    let critical_path_worker = critical_path_worker_index(workers).ok_or(Error::NoWorkers)?;

    let required = coalitions.len() + 1;
    if workers.len() < required {
        return Err(Error::InsufficientWorkers { required, available: workers.len() });
    }

    let coalition_workers: Vec<usize> = (0..workers.len()).filter(|worker| *worker != critical_path_worker).collect();

    let mut assignment = vec![critical_path_worker; workflow.len()];
    for (coalition, worker) in coalitions.iter().zip(&coalition_workers) {
        for agent in coalition.iter() {
            assignment[agents.non_critical[agent - 1]] = *worker;
        }
        log::debug!(
            "Coalition {:?} of workflow '{}' runs on worker '{}'.",
            coalition.iter().map(|agent| workflow.task_at(agents.non_critical[agent - 1]).id.as_str()).collect::<Vec<_>>(),
            workflow.id,
            workers[*worker].id
        );
    }

    let order = workflow.topological_order()?;
    let ranks = workflow.calculate_upward_rank(include_transfer_times)?;
    let priority = priority_order(&ranks, &order);

    let mut builder = ScheduleBuilder::new(workflow, workers, include_transfer_times)?;
    builder.schedule_in_passes(WorkflowSchedulerType::OdpIp, &priority, true, |task| vec![assignment[task]])?;
    builder.build(WorkflowSchedulerType::OdpIp)
}
