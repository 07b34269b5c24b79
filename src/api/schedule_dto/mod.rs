pub mod schedule_dto;
pub mod simulation_record_dto;
