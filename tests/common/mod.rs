#![allow(dead_code)]

use std::path::PathBuf;

use workflow_schedule_sim::domain::scheduling_model::schedule::schedule::Schedule;
use workflow_schedule_sim::domain::scheduling_model::utils::id::{TaskId, WorkerId};
use workflow_schedule_sim::domain::scheduling_model::workflow::task::Task;
use workflow_schedule_sim::domain::scheduling_model::workflow::workflow::Workflow;
use workflow_schedule_sim::load_workflow;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/data/test").join(name)
}

/// Start(1) -> Validate(3) -> {A(10), B(8)} -> Merge(3) -> Complete(1), every transfer 1.
pub fn order_pipeline() -> Workflow {
    load_workflow(fixture("order_pipeline.json")).unwrap()
}

/// The same graph built in code, for tests that tweak it.
pub fn order_pipeline_tasks() -> Vec<Task> {
    vec![
        Task::new("Start", "Receive Order", 1.0).connect("Validate", 1.0),
        Task::new("Validate", "Validate Order", 3.0).connect("A", 1.0).connect("B", 1.0),
        Task::new("A", "Reserve Stock", 10.0).connect("Merge", 1.0),
        Task::new("B", "Charge Payment", 8.0).connect("Merge", 1.0),
        Task::new("Merge", "Merge Results", 3.0).connect("Complete", 1.0),
        Task::new("Complete", "Confirm Order", 1.0),
    ]
}

pub fn task_id(id: &str) -> TaskId {
    TaskId::new(id)
}

pub fn worker_id(id: &str) -> WorkerId {
    WorkerId::new(id)
}

/// (start, end, worker) of a scheduled task.
pub fn placement(schedule: &Schedule, id: &str) -> (f64, f64, String) {
    let scheduled = schedule.get(&task_id(id)).unwrap();
    (scheduled.start_time, scheduled.end_time, scheduled.worker_id.to_string())
}

/// No two tasks on the same worker overlap.
pub fn assert_no_overlap(schedule: &Schedule) {
    for worker in &schedule.workers {
        let tasks = schedule.tasks_on(&worker.id);
        for pair in tasks.windows(2) {
            assert!(
                pair[1].start_time >= pair[0].end_time - 1e-9,
                "'{}' and '{}' overlap on '{}'",
                pair[0].node_id,
                pair[1].node_id,
                worker.id
            );
        }
    }
}

/// Every task appears exactly once.
pub fn assert_complete(schedule: &Schedule, workflow: &Workflow) {
    assert_eq!(schedule.scheduled_tasks.len(), workflow.len());
    for task in workflow.tasks() {
        assert_eq!(schedule.scheduled_tasks.iter().filter(|scheduled| scheduled.node_id == task.id).count(), 1, "task '{}'", task.id);
    }
}
