use serde::{Deserialize, Serialize};

use crate::domain::scheduling_model::utils::id::TaskId;
use crate::domain::scheduling_model::workflow::dependency::Connection;

/// Parameters of the Gamma distribution a duration is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GammaParameters {
    pub shape: f64,
    pub scale: f64,
}

impl GammaParameters {
    pub fn new(shape: f64, scale: f64) -> Self {
        GammaParameters { shape, scale }
    }

    pub fn mean(&self) -> f64 {
        self.shape * self.scale
    }
}

/// A node of the workflow graph (a computation task).
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,

    /// Seconds.
    pub execution_time: f64,

    /// Distribution the execution time is sampled from, if it is not fixed.
    pub duration_distribution: Option<GammaParameters>,

    /// Topological depth. Display only, recomputed when the workflow is built.
    pub level: usize,

    /// Outgoing edges, at most one per target.
    pub connections: Vec<Connection>,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>, execution_time: f64) -> Self {
        Task {
            id: TaskId::new(id),
            name: name.into(),
            execution_time,
            duration_distribution: None,
            level: 0,
            connections: Vec::new(),
        }
    }

    /// Adds an outgoing connection to `target`.
    pub fn connect(mut self, target: impl Into<String>, transfer_time: f64) -> Self {
        let connection = Connection::new(self.id.clone(), TaskId::new(target), transfer_time);
        self.connections.push(connection);
        self
    }

    pub fn with_distribution(mut self, distribution: GammaParameters) -> Self {
        self.duration_distribution = Some(distribution);
        self
    }

    /// Mean of the duration distribution, or the fixed execution time.
    pub fn expected_execution_time(&self) -> f64 {
        self.duration_distribution.map(|distribution| distribution.mean()).unwrap_or(self.execution_time)
    }
}
