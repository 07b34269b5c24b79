use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::domain::scheduling_model::critical_path::TIME_EPSILON;
use crate::domain::scheduling_model::resource::worker::Worker;
use crate::domain::scheduling_model::schedule::schedule::Schedule;
use crate::domain::scheduling_model::schedule::schedule_builder::{Candidate, ScheduleBuilder};
use crate::domain::scheduling_model::scheduler::workflow_scheduler::{TieBreak, WorkflowScheduler};
use crate::domain::scheduling_model::scheduler::workflow_scheduler_type::WorkflowSchedulerType;
use crate::domain::scheduling_model::workflow::workflow::Workflow;
use crate::error::Result;

/// First come first served list scheduler.
///
/// Walks the tasks in input order, over and over, placing each task as soon as all of its
/// predecessors are placed. The task is appended to the worker on which it finishes first;
/// idle gaps are never filled. Transfer times are always paid across workers.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyWorkflowScheduler {
    pub tie_break: TieBreak,
}

impl GreedyWorkflowScheduler {
    pub fn new(tie_break: TieBreak) -> Self {
        GreedyWorkflowScheduler { tie_break }
    }
}

impl WorkflowScheduler for GreedyWorkflowScheduler {
    fn scheduler_type(&self) -> WorkflowSchedulerType {
        WorkflowSchedulerType::Greedy
    }

    fn schedule(&self, workflow: &Workflow, workers: &[Worker]) -> Result<Schedule> {
        // Structural errors are reported before anything is placed.
        workflow.topological_order()?;

        let mut builder = ScheduleBuilder::new(workflow, workers, true)?;
        let mut rng = match self.tie_break {
            TieBreak::Seeded(seed) => Some(StdRng::seed_from_u64(seed)),
            TieBreak::Stable => None,
        };

        while !builder.is_complete() {
            let mut progress = false;

            for task in 0..workflow.len() {
                if builder.is_scheduled(task) || !builder.is_ready(task) {
                    continue;
                }

                let chosen = match rng.as_mut() {
                    Some(rng) => {
                        let candidates: Vec<Candidate> = (0..builder.worker_count()).map(|worker| builder.evaluate(task, worker, false)).collect();
                        let earliest_finish = candidates.iter().map(|candidate| candidate.finish).fold(f64::INFINITY, f64::min);
                        let ties: Vec<Candidate> =
                            candidates.into_iter().filter(|candidate| candidate.finish <= earliest_finish + TIME_EPSILON).collect();
                        ties.choose(rng).copied()
                    }
                    None => {
                        let workers: Vec<usize> = (0..builder.worker_count()).collect();
                        builder.earliest_finish(task, &workers, false)
                    }
                };
                let Some(chosen) = chosen else {
                    continue;
                };

                builder.place(task, chosen.worker, chosen.start);
                progress = true;
            }

            if !progress {
                return Err(builder.deadlock(WorkflowSchedulerType::Greedy));
            }
        }

        builder.build(WorkflowSchedulerType::Greedy)
    }
}

/// Greedy schedule with stable tie-breaking.
pub fn schedule_greedy(workflow: &Workflow, workers: &[Worker]) -> Result<Schedule> {
    GreedyWorkflowScheduler::default().schedule(workflow, workers)
}
