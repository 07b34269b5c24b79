use logtest::Logger;

use workflow_schedule_sim::domain::scheduling_model::schedule::schedule::ScheduledTask;
use workflow_schedule_sim::domain::scheduling_model::schedule::verifier::verify_scheduled_tasks;
use workflow_schedule_sim::domain::scheduling_model::utils::id::{TaskId, WorkerId};
use workflow_schedule_sim::domain::scheduling_model::workflow::task::Task;
use workflow_schedule_sim::domain::scheduling_model::workflow::workflow::Workflow;

// Single test: the capturing logger is process wide.
#[test]
fn test_violations_and_duplicate_edges_are_logged_as_warnings() {
    let mut logger = Logger::start();

    let workflow = Workflow::new(
        "pair",
        "Pair",
        vec![Task::new("P", "P", 2.0).connect("Q", 1.0).connect("Q", 3.0), Task::new("Q", "Q", 1.0)],
    )
    .unwrap();
    assert_eq!(workflow.transfer_time(&TaskId::new("P"), &TaskId::new("Q")), Some(3.0));

    let tasks = vec![
        ScheduledTask { node_id: TaskId::new("P"), start_time: 0.0, end_time: 2.0, worker_id: WorkerId::new("w1") },
        ScheduledTask { node_id: TaskId::new("Q"), start_time: 2.5, end_time: 3.5, worker_id: WorkerId::new("w2") },
    ];
    let report = verify_scheduled_tasks(&tasks, &workflow, true);
    assert_eq!(report.violation_count(), 1);

    let mut warnings = Vec::new();
    while let Some(record) = logger.pop() {
        if record.level() == log::Level::Warn {
            warnings.push(record.args().to_string());
        }
    }

    assert!(warnings.iter().any(|message| message.contains("Duplicate connection 'P' -> 'Q'")), "{:?}", warnings);
    assert!(warnings.iter().any(|message| message.contains("Schedule violation") && message.contains("'Q'")), "{:?}", warnings);
}
