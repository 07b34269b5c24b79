use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::api::schedule_dto::simulation_record_dto::SimulationRecordDto;
use crate::api::workflow_dto::workflow_dto::WorkflowDto;
use crate::domain::scheduling_model::persistence::simulation_store::SimulationStore;
use crate::domain::scheduling_model::schedule::schedule::Schedule;
use crate::domain::scheduling_model::utils::id::WorkflowId;
use crate::domain::scheduling_model::workflow::workflow::Workflow;
use crate::error::{Error, Result};
use crate::loader::parser::{parse_json_file, write_json_file};

const WORKFLOW_DIR: &str = "workflows";
const SIMULATION_DIR: &str = "simulations";

/// `SimulationStore` on plain JSON files below `root`:
///
/// ```text
/// root/workflows/<workflow id>.json
/// root/simulations/<workflow id>/<algorithm>-<simulation number>.json
/// ```
///
/// Saving a run with the same algorithm and simulation number again replaces the old record.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JsonFileStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn workflow_path(&self, workflow_id: &WorkflowId) -> Result<PathBuf> {
        Ok(self.root.join(WORKFLOW_DIR).join(format!("{}.json", file_name(workflow_id)?)))
    }

    fn simulation_dir(&self, workflow_id: &WorkflowId) -> Result<PathBuf> {
        Ok(self.root.join(SIMULATION_DIR).join(file_name(workflow_id)?))
    }
}

/// Workflow ids become file and directory names and must stay below the store root.
fn file_name(workflow_id: &WorkflowId) -> Result<&str> {
    let name = workflow_id.as_str();
    let is_safe = !name.is_empty() && name != "." && name != ".." && !name.chars().any(|c| matches!(c, '/' | '\\' | ':' | '\0'));
    if is_safe { Ok(name) } else { Err(Error::InvalidStoreKey(name.to_string())) }
}

impl SimulationStore for JsonFileStore {
    fn save_workflow(&self, workflow: &Workflow) -> Result<()> {
        let path = self.workflow_path(&workflow.id)?;
        write_json_file(&path, &workflow.to_dto())?;
        log::debug!("Stored workflow '{}' at '{}'.", workflow.id, path.display());
        Ok(())
    }

    fn load_workflow(&self, workflow_id: &WorkflowId) -> Result<Workflow> {
        let dto: WorkflowDto = parse_json_file(self.workflow_path(workflow_id)?)?;
        Workflow::try_from(dto)
    }

    fn save_schedule(&self, workflow_id: &WorkflowId, schedule: &Schedule, simulation_number: u32) -> Result<String> {
        let record = SimulationRecordDto {
            id: Uuid::new_v4().to_string(),
            workflow_id: workflow_id.to_string(),
            algorithm: schedule.algorithm.to_string(),
            simulation_number,
            created_at: Utc::now().to_rfc3339(),
            schedule: schedule.to_dto(),
        };

        let path = self.simulation_dir(workflow_id)?.join(format!("{}-{}.json", record.algorithm, simulation_number));
        write_json_file(&path, &record)?;
        log::info!("Saved {} run #{} of workflow '{}' as record {}.", record.algorithm, simulation_number, workflow_id, record.id);

        Ok(record.id)
    }

    fn load_simulations(&self, workflow_id: &WorkflowId) -> Result<Vec<SimulationRecordDto>> {
        let dir = self.simulation_dir(workflow_id)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|extension| extension == "json") {
                records.push(parse_json_file::<SimulationRecordDto>(&path)?);
            }
        }

        records.sort_by(|a, b| a.algorithm.cmp(&b.algorithm).then(a.simulation_number.cmp(&b.simulation_number)));
        Ok(records)
    }
}
