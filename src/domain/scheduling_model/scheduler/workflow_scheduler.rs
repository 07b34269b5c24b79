use crate::domain::scheduling_model::resource::worker::Worker;
use crate::domain::scheduling_model::schedule::schedule::Schedule;
use crate::domain::scheduling_model::scheduler::workflow_scheduler_type::WorkflowSchedulerType;
use crate::domain::scheduling_model::workflow::workflow::Workflow;
use crate::error::Result;

/// A strategy mapping a workflow onto a fixed pool of workers.
///
/// Implementations are pure functions of their input: all timeline state lives inside one
/// `schedule` call. A returned schedule contains every task; on failure nothing is returned.
pub trait WorkflowScheduler: std::fmt::Debug {
    fn scheduler_type(&self) -> WorkflowSchedulerType;

    fn schedule(&self, workflow: &Workflow, workers: &[Worker]) -> Result<Schedule>;
}

/// How equally good workers are chosen between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Lowest worker index wins.
    #[default]
    Stable,

    /// Uniform choice from a `StdRng` seeded with the value. Same seed, same schedule.
    Seeded(u64),
}
