use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Seconds.
    pub execution_time: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_distribution: Option<GammaDistributionDto>,

    #[serde(default)]
    pub connections: Vec<ConnectionDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDto {
    pub target_node_id: String,

    /// Seconds, only paid if source and target run on different workers.
    #[serde(default)]
    pub transfer_time: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_distribution: Option<GammaDistributionDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GammaDistributionDto {
    pub shape: f64,
    pub scale: f64,
}
