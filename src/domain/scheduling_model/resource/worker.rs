use crate::api::config_dto::worker_dto::WorkerDto;
use crate::api::schedule_dto::schedule_dto::WorkerStateDto;
use crate::domain::scheduling_model::utils::id::{TaskId, WorkerId};

/// A processing resource tasks are mapped onto.
#[derive(Debug, Clone, PartialEq)]
pub struct Worker {
    pub id: WorkerId,

    /// Only used for cost statistics.
    pub cost_per_hour: Option<f64>,

    /// Sum of the durations of all tasks assigned by the last schedule (seconds).
    pub time: f64,

    /// Designated resource for critical path tasks (CP-HEFT, ODP-IP).
    pub critical_path_worker: bool,

    // Display state of the surrounding application, never read by the schedulers.
    pub is_active: bool,
    pub current_task: Option<TaskId>,
}

impl Worker {
    pub fn new(id: impl Into<String>) -> Self {
        Worker {
            id: WorkerId::new(id),
            cost_per_hour: None,
            time: 0.0,
            critical_path_worker: false,
            is_active: false,
            current_task: None,
        }
    }

    pub fn with_cost_per_hour(mut self, cost_per_hour: f64) -> Self {
        self.cost_per_hour = Some(cost_per_hour);
        self
    }

    pub fn as_critical_path_worker(mut self) -> Self {
        self.critical_path_worker = true;
        self
    }

    /// Cost of the accumulated busy time, if the worker has a rate.
    pub fn cost(&self) -> Option<f64> {
        self.cost_per_hour.map(|rate| self.time * rate / 3600.0)
    }

    pub fn to_state_dto(&self) -> WorkerStateDto {
        WorkerStateDto {
            id: self.id.to_string(),
            time: self.time,
            cost_per_hour: self.cost_per_hour,
            critical_path_worker: self.critical_path_worker,
        }
    }
}

impl From<WorkerDto> for Worker {
    fn from(dto: WorkerDto) -> Self {
        Worker { cost_per_hour: dto.cost_per_hour, critical_path_worker: dto.critical_path_worker, ..Worker::new(dto.id) }
    }
}

/// `count` workers named `worker-1 ..= worker-count`; the first one is the critical path worker.
pub fn create_worker_pool(count: usize) -> Vec<Worker> {
    (1..=count)
        .map(|number| {
            let worker = Worker::new(format!("worker-{}", number));
            if number == 1 { worker.as_critical_path_worker() } else { worker }
        })
        .collect()
}

/// Position of the designated critical path worker, falling back to the first worker.
pub fn critical_path_worker_index(workers: &[Worker]) -> Option<usize> {
    match workers.iter().position(|worker| worker.critical_path_worker) {
        Some(position) => Some(position),
        None if !workers.is_empty() => {
            log::warn!("No worker is marked as critical path worker, using '{}'.", workers[0].id);
            Some(0)
        }
        None => None,
    }
}
