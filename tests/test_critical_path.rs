mod common;

use common::{order_pipeline, order_pipeline_tasks, task_id};
use workflow_schedule_sim::analyze_critical_path;
use workflow_schedule_sim::domain::scheduling_model::critical_path::analyzer::{CriticalPathAnalyzer, SinkBound, theoretical_minimum_duration};
use workflow_schedule_sim::domain::scheduling_model::workflow::task::Task;
use workflow_schedule_sim::domain::scheduling_model::workflow::workflow::Workflow;
use workflow_schedule_sim::error::Error;
use workflow_schedule_sim::load_workflow;

fn ids(path: &[workflow_schedule_sim::domain::scheduling_model::utils::id::TaskId]) -> Vec<&str> {
    path.iter().map(|id| id.as_str()).collect()
}

#[test]
fn test_order_pipeline_with_transfers() {
    let workflow = order_pipeline();
    let result = analyze_critical_path(&workflow, true).unwrap();

    assert_eq!(result.minimum_project_duration, 22.0);
    assert_eq!(ids(&result.ordered_critical_path), vec!["Start", "Validate", "A", "Merge", "Complete"]);
    assert_eq!(result.critical_path_duration(), 22.0);

    let b = result.timing(&task_id("B")).unwrap();
    assert_eq!(b.earliest_start, 6.0);
    assert_eq!(b.latest_start, 8.0);
    assert_eq!(b.slack, 2.0);
    assert!(!b.is_on_critical_path);

    let merge = result.timing(&task_id("Merge")).unwrap();
    assert_eq!((merge.earliest_start, merge.earliest_finish), (17.0, 20.0));
    assert!(result.is_critical(&task_id("Merge")));
    assert_eq!(result.critical_tasks().len(), 5);
    assert!(result.is_feasible());
}

#[test]
fn test_order_pipeline_without_transfers_is_the_lower_bound() {
    let workflow = order_pipeline();
    let result = analyze_critical_path(&workflow, false).unwrap();

    assert_eq!(result.minimum_project_duration, 18.0);
    assert_eq!(theoretical_minimum_duration(&workflow).unwrap(), 18.0);
    assert_eq!(result.timing(&task_id("A")).unwrap().earliest_start, 4.0);
    assert_eq!(result.timing(&task_id("B")).unwrap().slack, 2.0);
}

#[test]
fn test_critical_path_length_matches_project_duration() {
    let workflow = order_pipeline();
    let result = analyze_critical_path(&workflow, true).unwrap();

    let mut length = 0.0;
    for pair in result.ordered_critical_path.windows(2) {
        length += workflow.task(&pair[0]).unwrap().execution_time + workflow.transfer_time(&pair[0], &pair[1]).unwrap();
    }
    length += workflow.task(result.ordered_critical_path.last().unwrap()).unwrap().execution_time;

    assert!((length - result.minimum_project_duration).abs() < 1e-3);
}

#[test]
fn test_forward_pass_respects_every_edge() {
    let workflow = order_pipeline();
    for include_transfer_times in [true, false] {
        let result = analyze_critical_path(&workflow, include_transfer_times).unwrap();

        for (position, task) in workflow.tasks().iter().enumerate() {
            let timing = result.timing(&task.id).unwrap();
            assert!(timing.slack > -1e-3, "negative slack on '{}'", task.id);
            assert_eq!(timing.earliest_finish, timing.earliest_start + task.execution_time);

            for edge in workflow.predecessors(position) {
                let predecessor = result.timing(&workflow.task_at(edge.task).id).unwrap();
                let transfer = if include_transfer_times { edge.transfer_time } else { 0.0 };
                assert!(timing.earliest_start >= predecessor.earliest_finish + transfer - 1e-9);
            }
        }
    }
}

#[test]
fn test_deadline_shorter_than_critical_path_yields_negative_slack() {
    let workflow = order_pipeline();
    let result = CriticalPathAnalyzer::new(true).with_deadline(20.0).analyze(&workflow).unwrap();

    assert_eq!(result.horizon, 20.0);
    assert!(!result.is_feasible());
    assert!(result.negative_slack_tasks.contains(&task_id("A")));
    assert!(!result.negative_slack_tasks.contains(&task_id("B")));
    assert_eq!(result.timing(&task_id("A")).unwrap().slack, -2.0);
}

#[test]
fn test_tight_deadline_keeps_the_longest_chain_critical() {
    let workflow = order_pipeline();
    let result = CriticalPathAnalyzer::new(true).with_deadline(20.0).analyze(&workflow).unwrap();

    assert_eq!(ids(&result.ordered_critical_path), vec!["Start", "Validate", "A", "Merge", "Complete"]);
    assert!(!result.is_critical(&task_id("B")));
    assert_eq!(result.critical_tasks().len(), 5);
    assert_eq!(result.critical_path_duration(), result.minimum_project_duration);
}

#[test]
fn test_generous_deadline_adds_slack_everywhere() {
    let workflow = order_pipeline();
    let result = CriticalPathAnalyzer::new(true).with_deadline(30.0).analyze(&workflow).unwrap();

    assert!(result.is_feasible());
    assert_eq!(result.minimum_project_duration, 22.0);
    assert_eq!(result.timing(&task_id("Complete")).unwrap().latest_finish, 30.0);
    assert_eq!(result.timing(&task_id("Start")).unwrap().slack, 8.0);
}

#[test]
fn test_generous_deadline_keeps_the_longest_chain_critical() {
    let workflow = order_pipeline();
    let result = CriticalPathAnalyzer::new(true).with_deadline(30.0).analyze(&workflow).unwrap();

    assert_eq!(ids(&result.ordered_critical_path), vec!["Start", "Validate", "A", "Merge", "Complete"]);
    assert!(result.is_critical(&task_id("Merge")));
    assert!(!result.is_critical(&task_id("B")));
    assert_eq!(result.timing(&task_id("B")).unwrap().slack, 10.0);
    assert_eq!(result.critical_path_duration(), 22.0);
}

#[test]
fn test_short_sink_is_critical_unless_bound_by_horizon() {
    let mut tasks = order_pipeline_tasks();
    tasks.push(Task::new("Audit", "Audit Log", 2.0));
    let workflow = Workflow::new("audit", "Audit", tasks).unwrap();

    let own_finish = analyze_critical_path(&workflow, true).unwrap();
    assert!(own_finish.is_critical(&task_id("Audit")));
    assert_eq!(ids(&own_finish.ordered_critical_path), vec!["Start", "Validate", "A", "Merge", "Complete"]);

    let horizon = CriticalPathAnalyzer::new(true).with_sink_bound(SinkBound::ProjectHorizon).analyze(&workflow).unwrap();
    assert!(!horizon.is_critical(&task_id("Audit")));
    assert_eq!(horizon.timing(&task_id("Audit")).unwrap().slack, 20.0);
    assert_eq!(horizon.critical_tasks().len(), 5);
}

#[test]
fn test_equal_branches_yield_one_full_length_path() {
    let workflow = Workflow::new(
        "twins",
        "Twins",
        vec![
            Task::new("S", "S", 1.0).connect("L", 0.0).connect("R", 0.0),
            Task::new("L", "L", 5.0).connect("E", 0.0),
            Task::new("R", "R", 5.0).connect("E", 0.0),
            Task::new("E", "E", 1.0),
        ],
    )
    .unwrap();
    let result = analyze_critical_path(&workflow, true).unwrap();

    assert_eq!(result.critical_tasks().len(), 4);
    assert_eq!(result.ordered_critical_path.len(), 3);
    assert_eq!(result.critical_path_duration(), 7.0);
}

#[test]
fn test_single_task_and_empty_workflow() {
    let single = Workflow::new("single", "Single", vec![Task::new("only", "Only", 4.5)]).unwrap();
    let result = analyze_critical_path(&single, true).unwrap();
    assert_eq!(result.minimum_project_duration, 4.5);
    assert_eq!(ids(&result.ordered_critical_path), vec!["only"]);

    let empty = Workflow::new("empty", "Empty", Vec::new()).unwrap();
    let result = analyze_critical_path(&empty, true).unwrap();
    assert_eq!(result.minimum_project_duration, 0.0);
    assert!(result.ordered_critical_path.is_empty());
}

#[test]
fn test_cycle_is_reported_with_its_tasks() {
    let workflow = load_workflow(common::fixture("cyclic_workflow.json")).unwrap();

    match analyze_critical_path(&workflow, true) {
        Err(e @ Error::CycleDetected { .. }) => {
            assert!(e.is_malformed_graph());
            if let Error::CycleDetected { cycle } = e {
                assert_eq!(cycle, vec!["A", "B", "A"]);
            }
        }
        other => panic!("expected a cycle, got {:?}", other),
    }
}

#[test]
fn test_zeroing_critical_path_transfers() {
    let mut workflow = order_pipeline();
    let result = analyze_critical_path(&workflow, true).unwrap();

    assert_eq!(workflow.zero_critical_path_transfers(&result.ordered_critical_path).unwrap(), 4);
    assert_eq!(workflow.transfer_time(&task_id("A"), &task_id("Merge")), Some(0.0));
    assert_eq!(workflow.transfer_time(&task_id("B"), &task_id("Merge")), Some(1.0));

    assert_eq!(analyze_critical_path(&workflow, true).unwrap().minimum_project_duration, 18.0);
    assert_eq!(workflow.zero_critical_path_transfers(&result.ordered_critical_path).unwrap(), 0);
}

#[test]
fn test_zeroed_distributed_transfer_survives_expected_durations() {
    let mut workflow = order_pipeline();

    assert_eq!(workflow.zero_critical_path_transfers(&[task_id("B"), task_id("Merge")]).unwrap(), 1);

    let expected = workflow.with_expected_durations();
    assert_eq!(expected.transfer_time(&task_id("B"), &task_id("Merge")), Some(0.0));
    assert_eq!(expected.transfer_time(&task_id("A"), &task_id("Merge")), Some(1.0));
}
