pub mod config_dto;
pub mod schedule_dto;
pub mod workflow_dto;
