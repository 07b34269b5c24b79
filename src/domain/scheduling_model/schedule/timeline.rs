use crate::domain::scheduling_model::critical_path::TIME_EPSILON;

/// A task occupying a worker for `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusyInterval {
    pub start: f64,
    pub end: f64,

    /// Position of the task in the workflow.
    pub task: usize,
}

/// Occupation of one worker during a single scheduling run, sorted by start time.
#[derive(Debug, Clone, Default)]
pub struct WorkerTimeline {
    intervals: Vec<BusyInterval>,
}

impl WorkerTimeline {
    pub fn new() -> Self {
        WorkerTimeline { intervals: Vec::new() }
    }

    pub fn intervals(&self) -> &[BusyInterval] {
        &self.intervals
    }

    /// End of the last task on this worker, 0 for an idle worker.
    pub fn available_at(&self) -> f64 {
        self.intervals.iter().map(|interval| interval.end).fold(0.0, f64::max)
    }

    /// Sum of all busy intervals.
    pub fn busy_time(&self) -> f64 {
        self.intervals.iter().map(|interval| interval.end - interval.start).sum()
    }

    /// Earliest start `>= ready_time` at which a task of `duration` fits, either into an idle
    /// gap between two tasks or after the last one.
    pub fn find_earliest_slot(&self, ready_time: f64, duration: f64) -> f64 {
        let mut previous_end: f64 = 0.0;

        for interval in &self.intervals {
            let start = ready_time.max(previous_end);
            if start + duration <= interval.start + TIME_EPSILON {
                return start;
            }
            previous_end = previous_end.max(interval.end);
        }

        ready_time.max(previous_end)
    }

    /// Books `[start, start + duration)` for `task`.
    ///
    /// # Returns
    /// `true` if the interval was inserted; `false` if it overlaps an existing one (nothing is changed).
    pub fn insert(&mut self, task: usize, start: f64, duration: f64) -> bool {
        let end = start + duration;

        if let Some(conflict) =
            self.intervals.iter().find(|interval| start < interval.end - TIME_EPSILON && interval.start < end - TIME_EPSILON)
        {
            log::error!(
                "Interval [{}, {}) of task #{} overlaps task #{} at [{}, {}) --> Signals an error in the slot search.",
                start,
                end,
                task,
                conflict.task,
                conflict.start,
                conflict.end
            );
            return false;
        }

        let position = self.intervals.partition_point(|interval| interval.start <= start);
        self.intervals.insert(position, BusyInterval { start, end, task });
        true
    }
}
