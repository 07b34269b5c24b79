pub mod scheduling_config_dto;
pub mod worker_dto;
