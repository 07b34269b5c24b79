pub mod dependency;
pub mod sampler;
pub mod task;
pub mod workflow;
