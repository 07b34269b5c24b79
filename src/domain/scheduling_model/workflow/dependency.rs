use crate::domain::scheduling_model::utils::id::TaskId;
use crate::domain::scheduling_model::workflow::task::GammaParameters;

/// A directed data dependency, owned by its source task.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    /// Key of the sending task.
    pub source: TaskId,

    /// Key of the receiving task.
    pub target: TaskId,

    /// Seconds. Only paid if source and target are executed on different workers.
    pub transfer_time: f64,

    /// Distribution the transfer time is sampled from, if it is not fixed.
    pub transfer_distribution: Option<GammaParameters>,
}

impl Connection {
    pub fn new(source: TaskId, target: TaskId, transfer_time: f64) -> Self {
        Connection { source, target, transfer_time, transfer_distribution: None }
    }

    pub fn expected_transfer_time(&self) -> f64 {
        self.transfer_distribution.map(|distribution| distribution.mean()).unwrap_or(self.transfer_time)
    }
}

/// Index based adjacency entry used by the scheduling algorithms.
/// `task` is the position of the neighbour in `Workflow::tasks()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub task: usize,
    pub transfer_time: f64,
}
