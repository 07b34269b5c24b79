use serde::{Deserialize, Serialize};

use crate::api::config_dto::worker_dto::WorkerDto;

fn default_true() -> bool {
    true
}

fn default_simulations() -> u32 {
    1
}

fn default_output_dir() -> String {
    "output".to_string()
}

/// Run configuration read by the binary. Every field has a default, so `{}` is a valid file.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingConfigDto {
    #[serde(default = "default_true")]
    pub include_transfer_times: bool,

    /// Explicit worker pool. Takes precedence over `worker_count`.
    #[serde(default)]
    pub workers: Vec<WorkerDto>,

    #[serde(default)]
    pub worker_count: Option<usize>,

    /// Names as accepted by `WorkflowSchedulerType::from_str`. Empty means all.
    #[serde(default)]
    pub algorithms: Vec<String>,

    #[serde(default = "default_simulations")]
    pub simulations: u32,

    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub zero_critical_path_transfers: bool,

    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for SchedulingConfigDto {
    fn default() -> Self {
        SchedulingConfigDto {
            include_transfer_times: true,
            workers: Vec::new(),
            worker_count: None,
            algorithms: Vec::new(),
            simulations: default_simulations(),
            seed: None,
            zero_critical_path_transfers: false,
            output_dir: default_output_dir(),
        }
    }
}
