mod common;

use common::{assert_complete, assert_no_overlap, order_pipeline, order_pipeline_tasks, placement};
use workflow_schedule_sim::domain::scheduling_model::resource::worker::{Worker, create_worker_pool};
use workflow_schedule_sim::domain::scheduling_model::scheduler::greedy_workflow_scheduler::GreedyWorkflowScheduler;
use workflow_schedule_sim::domain::scheduling_model::scheduler::workflow_scheduler::{TieBreak, WorkflowScheduler};
use workflow_schedule_sim::domain::scheduling_model::scheduler::workflow_scheduler_type::WorkflowSchedulerType;
use workflow_schedule_sim::domain::scheduling_model::workflow::task::Task;
use workflow_schedule_sim::domain::scheduling_model::workflow::workflow::Workflow;
use workflow_schedule_sim::error::Error;
use workflow_schedule_sim::schedule_greedy;

#[test]
fn test_greedy_on_two_workers() {
    let workflow = order_pipeline();
    let schedule = schedule_greedy(&workflow, &create_worker_pool(2)).unwrap();

    assert_eq!(schedule.algorithm, WorkflowSchedulerType::Greedy);
    assert_complete(&schedule, &workflow);
    assert_no_overlap(&schedule);
    assert!(schedule.is_valid());

    assert_eq!(placement(&schedule, "Start"), (0.0, 1.0, "worker-1".to_string()));
    assert_eq!(placement(&schedule, "A"), (4.0, 14.0, "worker-1".to_string()));
    // Validate ran on worker-1, so B pays the transfer on worker-2.
    assert_eq!(placement(&schedule, "B"), (5.0, 13.0, "worker-2".to_string()));
    assert_eq!(placement(&schedule, "Merge"), (14.0, 17.0, "worker-1".to_string()));
    assert_eq!(schedule.makespan(), 18.0);
}

#[test]
fn test_greedy_on_a_single_worker_is_sequential() {
    let workflow = order_pipeline();
    let schedule = schedule_greedy(&workflow, &create_worker_pool(1)).unwrap();

    assert_eq!(schedule.makespan(), workflow.total_execution_time());
    assert_eq!(schedule.used_workers(), 1);
    assert_eq!(schedule.workers[0].time, 26.0);
}

#[test]
fn test_greedy_walks_the_input_order_until_everything_is_placed() {
    // Successors listed before their predecessors need several passes.
    let workflow = Workflow::new(
        "reversed",
        "Reversed",
        vec![Task::new("C", "C", 1.0), Task::new("B", "B", 2.0).connect("C", 0.5), Task::new("A", "A", 3.0).connect("B", 0.5)],
    )
    .unwrap();
    let schedule = schedule_greedy(&workflow, &create_worker_pool(2)).unwrap();

    let placed: Vec<&str> = schedule.scheduled_tasks.iter().map(|scheduled| scheduled.node_id.as_str()).collect();
    assert_eq!(placed, vec!["A", "B", "C"]);
    assert_eq!(schedule.makespan(), 6.0);
    assert!(schedule.is_valid());
}

#[test]
fn test_greedy_never_fills_gaps() {
    let workflow = order_pipeline();
    let schedule = schedule_greedy(&workflow, &create_worker_pool(3)).unwrap();

    // In placement order every worker only ever grows at its end.
    let mut last_end = std::collections::HashMap::new();
    for scheduled in &schedule.scheduled_tasks {
        let end = last_end.entry(scheduled.worker_id.clone()).or_insert(0.0);
        assert!(scheduled.start_time >= *end);
        *end = scheduled.end_time;
    }
}

#[test]
fn test_greedy_independent_tasks_spread_over_workers() {
    let workflow = Workflow::new("independent", "Independent", (1..=4).map(|i| Task::new(format!("t{}", i), "t", 2.0)).collect()).unwrap();
    let schedule = schedule_greedy(&workflow, &create_worker_pool(4)).unwrap();

    assert_eq!(schedule.makespan(), 2.0);
    assert_eq!(schedule.used_workers(), 4);
}

#[test]
fn test_seeded_tie_break_is_reproducible() {
    let workflow = Workflow::new("independent", "Independent", (1..=8).map(|i| Task::new(format!("t{}", i), "t", 1.0)).collect()).unwrap();
    let workers = create_worker_pool(4);

    let first = GreedyWorkflowScheduler::new(TieBreak::Seeded(7)).schedule(&workflow, &workers).unwrap();
    let second = GreedyWorkflowScheduler::new(TieBreak::Seeded(7)).schedule(&workflow, &workers).unwrap();

    assert_eq!(first.scheduled_tasks, second.scheduled_tasks);
    assert_eq!(first.makespan(), 2.0);
}

#[test]
fn test_greedy_without_workers_fails() {
    let workflow = Workflow::new("wf", "Wf", order_pipeline_tasks()).unwrap();
    let workers: Vec<Worker> = Vec::new();

    assert!(matches!(schedule_greedy(&workflow, &workers), Err(Error::NoWorkers)));
}

#[test]
fn test_greedy_rejects_cycles_before_placing() {
    let workflow = workflow_schedule_sim::load_workflow(common::fixture("cyclic_workflow.json")).unwrap();
    let result = schedule_greedy(&workflow, &create_worker_pool(2));

    assert!(matches!(result, Err(Error::CycleDetected { .. })));
}

#[test]
fn test_greedy_picks_the_strictly_earliest_finish() {
    // Worker-1 could run B only 0.0005 later than worker-2; that is not a tie.
    let workflow = Workflow::new(
        "near-tie",
        "Near Tie",
        vec![Task::new("C", "C", 1.0005), Task::new("A", "A", 1.0).connect("B", 0.0), Task::new("B", "B", 1.0)],
    )
    .unwrap();
    let schedule = schedule_greedy(&workflow, &create_worker_pool(2)).unwrap();

    assert_eq!(placement(&schedule, "C").2, "worker-1");
    assert_eq!(placement(&schedule, "A"), (0.0, 1.0, "worker-2".to_string()));
    assert_eq!(placement(&schedule, "B"), (1.0, 2.0, "worker-2".to_string()));
    assert_eq!(schedule.makespan(), 2.0);
}
