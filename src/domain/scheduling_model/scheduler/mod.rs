pub mod cp_heft_workflow_scheduler;
pub mod greedy_workflow_scheduler;
pub mod heft_workflow_scheduler;
pub mod odp_ip_workflow_scheduler;
pub mod workflow_scheduler;
pub mod workflow_scheduler_type;
