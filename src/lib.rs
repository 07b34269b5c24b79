use std::path::Path;

use crate::api::workflow_dto::workflow_dto::WorkflowDto;
use crate::domain::scheduling_model::workflow::workflow::Workflow;
use crate::error::Result;
use crate::loader::parser::parse_json_file;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

pub use crate::domain::scheduling_model::coalition::partition_schedule::apply_partition_schedule;
pub use crate::domain::scheduling_model::coalition::subset_values::build_subset_values;
pub use crate::domain::scheduling_model::critical_path::analyzer::analyze_critical_path;
pub use crate::domain::scheduling_model::scheduler::cp_heft_workflow_scheduler::schedule_cp_heft;
pub use crate::domain::scheduling_model::scheduler::greedy_workflow_scheduler::schedule_greedy;
pub use crate::domain::scheduling_model::scheduler::heft_workflow_scheduler::schedule_heft;

/// Reads and validates a workflow JSON file.
pub fn load_workflow(file_path: impl AsRef<Path>) -> Result<Workflow> {
    let file_path = file_path.as_ref();
    let dto: WorkflowDto = parse_json_file(file_path)?;
    log::debug!("Parsed workflow file '{}'.", file_path.display());

    let workflow = Workflow::try_from(dto)?;
    log::info!("Loaded workflow '{}' with {} task(s) from '{}'.", workflow.id, workflow.len(), file_path.display());

    Ok(workflow)
}
