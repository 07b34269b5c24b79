pub mod schedule;
pub mod schedule_builder;
pub mod timeline;
pub mod verifier;
