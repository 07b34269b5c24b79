use serde::{Deserialize, Serialize};

use crate::api::workflow_dto::task_dto::TaskDto;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDto {
    pub id: String,

    #[serde(default)]
    pub name: String,

    pub tasks: Vec<TaskDto>,
}
