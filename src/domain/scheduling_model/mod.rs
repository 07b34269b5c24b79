pub mod coalition;
pub mod critical_path;
pub mod persistence;
pub mod resource;
pub mod schedule;
pub mod scheduler;
pub mod utils;
pub mod workflow;
