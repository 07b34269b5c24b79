use crate::api::schedule_dto::simulation_record_dto::SimulationRecordDto;
use crate::domain::scheduling_model::schedule::schedule::Schedule;
use crate::domain::scheduling_model::utils::id::WorkflowId;
use crate::domain::scheduling_model::workflow::workflow::Workflow;
use crate::error::Result;

/// Storage of workflows and of the schedules computed for them.
pub trait SimulationStore {
    fn save_workflow(&self, workflow: &Workflow) -> Result<()>;

    fn load_workflow(&self, workflow_id: &WorkflowId) -> Result<Workflow>;

    /// Stores one scheduling run and returns the id of the new record.
    fn save_schedule(&self, workflow_id: &WorkflowId, schedule: &Schedule, simulation_number: u32) -> Result<String>;

    /// All runs stored for `workflow_id`, ordered by algorithm and simulation number.
    fn load_simulations(&self, workflow_id: &WorkflowId) -> Result<Vec<SimulationRecordDto>>;
}
