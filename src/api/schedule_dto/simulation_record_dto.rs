use serde::{Deserialize, Serialize};

use crate::api::schedule_dto::schedule_dto::ScheduleDto;

/// A persisted scheduling run: one algorithm applied to one (sampled) workflow.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRecordDto {
    pub id: String,
    pub workflow_id: String,
    pub algorithm: String,
    pub simulation_number: u32,

    /// RFC 3339
    pub created_at: String,

    pub schedule: ScheduleDto,
}
