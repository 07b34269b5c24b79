pub mod coalition_solver;
pub mod partition_schedule;
pub mod subset_values;
