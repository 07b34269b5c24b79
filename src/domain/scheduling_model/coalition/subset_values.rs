use crate::domain::scheduling_model::critical_path::analyzer::analyze_critical_path;
use crate::domain::scheduling_model::utils::id::TaskId;
use crate::domain::scheduling_model::workflow::workflow::Workflow;
use crate::error::{Error, Result};

/// Largest number of non-critical tasks `build_subset_values` accepts. The value table has
/// `2^n` entries, so this is a hard scale limit of the technique.
pub const MAX_COALITION_AGENTS: usize = 20;

/// Input of the coalition structure solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SubsetValues {
    /// `values[mask]` is the value of the coalition whose agents are the set bits of `mask`.
    pub values: Vec<f64>,

    /// Expected busy time of the critical path worker.
    pub critical_path_duration: f64,

    /// Agent `i` (bit `i`, 1-indexed `i + 1` in partitions) is `non_critical_tasks[i]`.
    pub non_critical_tasks: Vec<TaskId>,

    pub critical_tasks: Vec<TaskId>,
}

impl SubsetValues {
    pub fn num_agents(&self) -> usize {
        self.non_critical_tasks.len()
    }
}

/// Critical/non-critical split of a workflow based on expected durations.
#[derive(Debug, Clone)]
pub(crate) struct CoalitionAgents {
    /// Workflow positions of the non-critical tasks in input order; index = agent.
    pub non_critical: Vec<usize>,
    pub critical: Vec<usize>,

    /// Expected execution time per workflow position.
    pub expected_execution_time: Vec<f64>,

    pub critical_path_duration: f64,
}

/// Splits the workflow on its expected durations. The critical path duration is the summed
/// expected execution time of the ordered critical path: those tasks share one worker, so
/// they pay no transfers.
pub(crate) fn coalition_agents(workflow: &Workflow) -> Result<CoalitionAgents> {
    let expected = workflow.with_expected_durations();
    let analysis = analyze_critical_path(&expected, true)?;

    let (critical, non_critical): (Vec<usize>, Vec<usize>) = (0..expected.len()).partition(|task| analysis.is_critical(&expected.task_at(*task).id));
    let expected_execution_time: Vec<f64> = expected.tasks().iter().map(|task| task.execution_time).collect();

    let critical_path_duration = analysis
        .ordered_critical_path
        .iter()
        .filter_map(|task_id| expected.index_of(task_id))
        .map(|task| expected_execution_time[task])
        .sum();

    Ok(CoalitionAgents { non_critical, critical, expected_execution_time, critical_path_duration })
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Values every subset of the non-critical tasks for the coalition structure solver.
///
/// The value of a subset is its summed expected execution time (rounded to two decimals) if
/// that sum fits into the critical path duration, and 0 otherwise; the empty subset is worth 0.
/// A coalition is thereby rewarded for filling one worker up to, but not past, the length of
/// the critical path.
///
/// Fails with `Error::CoalitionTooLarge` for more than `MAX_COALITION_AGENTS` non-critical tasks.
pub fn build_subset_values(workflow: &Workflow) -> Result<SubsetValues> {
    let agents = coalition_agents(workflow)?;
    let n = agents.non_critical.len();
    if n > MAX_COALITION_AGENTS {
        return Err(Error::CoalitionTooLarge { agents: n, max: MAX_COALITION_AGENTS });
    }

    let times: Vec<f64> = agents.non_critical.iter().map(|task| agents.expected_execution_time[*task]).collect();
    let size = 1usize << n;
    let mut sums = vec![0.0; size];
    let mut values = vec![0.0; size];

    for mask in 1..size {
        let lowest_agent = mask.trailing_zeros() as usize;
        sums[mask] = sums[mask & (mask - 1)] + times[lowest_agent];

        values[mask] = if sums[mask] > agents.critical_path_duration + 1e-9 { 0.0 } else { round_to_cents(sums[mask]) };
    }

    log::debug!(
        "Valued {} subsets of {} non-critical task(s) of workflow '{}' against critical path duration {}.",
        size,
        n,
        workflow.id,
        agents.critical_path_duration
    );

    Ok(SubsetValues {
        values,
        critical_path_duration: agents.critical_path_duration,
        non_critical_tasks: agents.non_critical.iter().map(|task| workflow.task_at(*task).id.clone()).collect(),
        critical_tasks: agents.critical.iter().map(|task| workflow.task_at(*task).id.clone()).collect(),
    })
}
