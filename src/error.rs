use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse workflow JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to write statistics: {0}")]
    CsvError(#[from] csv::Error),

    #[error(transparent)]
    ConversionError(#[from] ConversionError),

    #[error("Task id '{0}' is used by more than one task.")]
    DuplicateTaskId(String),

    #[error("Connection '{source_task}' -> '{target_task}' references a task that does not exist.")]
    UnknownTaskReference { source_task: String, target_task: String },

    #[error("Task '{0}' has a connection to itself.")]
    SelfLoop(String),

    #[error("Invalid duration {value} on '{element}': durations must be finite and non-negative.")]
    InvalidDuration { element: String, value: f64 },

    #[error("Workflow contains a cycle: {}", .cycle.join(" -> "))]
    CycleDetected { cycle: Vec<String> },

    #[error("Task '{0}' is not part of the workflow.")]
    UnknownTask(String),

    #[error("{algorithm} made no progress while {} task(s) remained unscheduled: {}", .unscheduled.len(), .unscheduled.join(", "))]
    SchedulingDeadlock { algorithm: String, unscheduled: Vec<String> },

    #[error("At least one worker is required to build a schedule.")]
    NoWorkers,

    #[error("Schedule requires {required} workers, but only {available} are available.")]
    InsufficientWorkers { required: usize, available: usize },

    #[error("Coalition valuation over {agents} tasks exceeds the supported maximum of {max}.")]
    CoalitionTooLarge { agents: usize, max: usize },

    #[error("Workflow id '{0}' cannot be used as a file name.")]
    InvalidStoreKey(String),

    #[error("Coalition structure solver failed: {0}")]
    SolverFailure(String),
}

impl Error {
    /// Structural problems of the task graph itself (missing nodes, loops, cycles, bad weights).
    pub fn is_malformed_graph(&self) -> bool {
        matches!(
            self,
            Error::DuplicateTaskId(_)
                | Error::UnknownTaskReference { .. }
                | Error::SelfLoop(_)
                | Error::InvalidDuration { .. }
                | Error::CycleDetected { .. }
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Unknown workflow scheduler type: '{0}'")]
    UnknownSchedulerType(String),
}

pub type Result<T> = std::result::Result<T, Error>;
