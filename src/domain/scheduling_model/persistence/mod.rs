pub mod json_file_store;
pub mod simulation_store;
