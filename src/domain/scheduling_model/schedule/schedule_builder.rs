use crate::domain::scheduling_model::resource::worker::Worker;
use crate::domain::scheduling_model::schedule::schedule::{Schedule, ScheduledTask};
use crate::domain::scheduling_model::schedule::timeline::WorkerTimeline;
use crate::domain::scheduling_model::schedule::verifier::verify_scheduled_tasks;
use crate::domain::scheduling_model::scheduler::workflow_scheduler_type::WorkflowSchedulerType;
use crate::domain::scheduling_model::workflow::workflow::Workflow;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub worker: usize,
    pub start: f64,
    pub end: f64,
}

/// A candidate worker for a task, as evaluated by `ScheduleBuilder::evaluate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub worker: usize,
    pub start: f64,
    pub finish: f64,
}

/// State of a single list scheduling run: one timeline per worker plus the placement of
/// every task scheduled so far. Discarded once the schedule is built.
#[derive(Debug)]
pub struct ScheduleBuilder<'a> {
    workflow: &'a Workflow,
    workers: &'a [Worker],
    include_transfer_times: bool,
    timelines: Vec<WorkerTimeline>,
    placements: Vec<Option<Placement>>,
    placement_order: Vec<usize>,
}

impl<'a> ScheduleBuilder<'a> {
    pub fn new(workflow: &'a Workflow, workers: &'a [Worker], include_transfer_times: bool) -> Result<Self> {
        if workers.is_empty() {
            return Err(Error::NoWorkers);
        }

        Ok(ScheduleBuilder {
            workflow,
            workers,
            include_transfer_times,
            timelines: vec![WorkerTimeline::new(); workers.len()],
            placements: vec![None; workflow.len()],
            placement_order: Vec::with_capacity(workflow.len()),
        })
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn placement(&self, task: usize) -> Option<Placement> {
        self.placements[task]
    }

    pub fn is_scheduled(&self, task: usize) -> bool {
        self.placements[task].is_some()
    }

    /// All predecessors of `task` are placed.
    pub fn is_ready(&self, task: usize) -> bool {
        self.workflow.predecessors(task).iter().all(|edge| self.is_scheduled(edge.task))
    }

    pub fn is_complete(&self) -> bool {
        self.placement_order.len() == self.workflow.len()
    }

    /// Earliest time all input data of `task` is available on `worker`.
    /// Predecessors must be placed already; unplaced ones are ignored.
    pub fn data_ready_time(&self, task: usize, worker: usize) -> f64 {
        self.workflow
            .predecessors(task)
            .iter()
            .filter_map(|edge| {
                let placement = self.placements[edge.task]?;
                let transfer = if self.include_transfer_times && placement.worker != worker { edge.transfer_time } else { 0.0 };
                Some(placement.end + transfer)
            })
            .fold(0.0, f64::max)
    }

    /// Start and finish of `task` on `worker`. With `insertion` idle gaps are searched,
    /// otherwise the task is appended after the last task of the worker.
    pub fn evaluate(&self, task: usize, worker: usize, insertion: bool) -> Candidate {
        let duration = self.workflow.task_at(task).execution_time;
        let ready = self.data_ready_time(task, worker);
        let timeline = &self.timelines[worker];

        let start = if insertion { timeline.find_earliest_slot(ready, duration) } else { ready.max(timeline.available_at()) };
        Candidate { worker, start, finish: start + duration }
    }

    /// Candidate with the earliest finish among `workers`; ties go to the earlier entry.
    pub fn earliest_finish(&self, task: usize, workers: &[usize], insertion: bool) -> Option<Candidate> {
        workers.iter().map(|worker| self.evaluate(task, *worker, insertion)).fold(None, |best: Option<Candidate>, candidate| match best {
            Some(best) if best.finish <= candidate.finish => Some(best),
            _ => Some(candidate),
        })
    }

    pub fn place(&mut self, task: usize, worker: usize, start: f64) {
        let duration = self.workflow.task_at(task).execution_time;

        if !self.timelines[worker].insert(task, start, duration) {
            log::error!("Task '{}' was placed on an occupied interval of worker '{}'.", self.workflow.task_at(task).id, self.workers[worker].id);
        }

        log::debug!("Placed task '{}' on worker '{}' at [{}, {}).", self.workflow.task_at(task).id, self.workers[worker].id, start, start + duration);

        self.placements[task] = Some(Placement { worker, start, end: start + duration });
        self.placement_order.push(task);
    }

    /// Repeatedly walks `priority` and places every task whose predecessors are all placed,
    /// on the earliest finishing worker from `candidates(task)`, until all tasks are placed.
    ///
    /// A pass without any placement means the remaining tasks can never become ready and
    /// yields `Error::SchedulingDeadlock`.
    pub fn schedule_in_passes<F>(&mut self, algorithm: WorkflowSchedulerType, priority: &[usize], insertion: bool, mut candidates: F) -> Result<()>
    where
        F: FnMut(usize) -> Vec<usize>,
    {
        let mut pass = 0;
        while !self.is_complete() {
            pass += 1;
            let mut progress = false;

            for &task in priority {
                if self.is_scheduled(task) || !self.is_ready(task) {
                    continue;
                }

                let workers = candidates(task);
                let Some(best) = self.earliest_finish(task, &workers, insertion) else {
                    log::warn!("No candidate worker for task '{}'.", self.workflow.task_at(task).id);
                    continue;
                };
                self.place(task, best.worker, best.start);
                progress = true;
            }

            if !progress {
                return Err(self.deadlock(algorithm));
            }
        }

        log::debug!("{} placed {} task(s) in {} pass(es).", algorithm, self.workflow.len(), pass);
        Ok(())
    }

    pub fn deadlock(&self, algorithm: WorkflowSchedulerType) -> Error {
        let unscheduled = (0..self.workflow.len())
            .filter(|task| !self.is_scheduled(*task))
            .map(|task| self.workflow.task_at(task).id.to_string())
            .collect();
        Error::SchedulingDeadlock { algorithm: algorithm.to_string(), unscheduled }
    }

    /// Turns the placements into a `Schedule`, updates the worker states and runs the verifier.
    pub fn build(self, algorithm: WorkflowSchedulerType) -> Result<Schedule> {
        if !self.is_complete() {
            return Err(self.deadlock(algorithm));
        }

        let mut scheduled_tasks = Vec::with_capacity(self.placement_order.len());
        for &task in &self.placement_order {
            if let Some(placement) = self.placements[task] {
                scheduled_tasks.push(ScheduledTask {
                    node_id: self.workflow.task_at(task).id.clone(),
                    start_time: placement.start,
                    end_time: placement.end,
                    worker_id: self.workers[placement.worker].id.clone(),
                });
            }
        }

        let workers = self
            .workers
            .iter()
            .zip(&self.timelines)
            .map(|(worker, timeline)| Worker { time: timeline.busy_time(), is_active: false, current_task: None, ..worker.clone() })
            .collect();

        let verification = verify_scheduled_tasks(&scheduled_tasks, self.workflow, self.include_transfer_times);
        if !verification.is_valid() {
            log::warn!("{} schedule of workflow '{}' has {} violation(s).", algorithm, self.workflow.id, verification.violation_count());
        }

        let schedule = Schedule { algorithm, scheduled_tasks, workers, verification };
        log::info!(
            "{} scheduled workflow '{}' ({} tasks) on {} of {} worker(s), makespan {:.3}.",
            algorithm,
            self.workflow.id,
            self.workflow.len(),
            schedule.used_workers(),
            self.workers.len(),
            schedule.makespan()
        );

        Ok(schedule)
    }
}
