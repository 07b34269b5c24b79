use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorkerDto {
    pub id: String,

    #[serde(default)]
    pub cost_per_hour: Option<f64>,

    #[serde(default)]
    pub critical_path_worker: bool,
}
