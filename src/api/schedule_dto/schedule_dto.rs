use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDto {
    pub algorithm: String,
    pub makespan: f64,
    pub scheduled_tasks: Vec<ScheduledTaskDto>,
    pub workers: Vec<WorkerStateDto>,
    pub verification_violations: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTaskDto {
    pub node_id: String,
    pub start_time: f64,
    pub end_time: f64,
    pub worker_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkerStateDto {
    pub id: String,
    pub time: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_hour: Option<f64>,

    #[serde(default)]
    pub critical_path_worker: bool,
}
