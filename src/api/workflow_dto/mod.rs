pub mod task_dto;
pub mod workflow_dto;
