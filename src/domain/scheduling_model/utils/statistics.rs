use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::scheduling_model::schedule::schedule::Schedule;
use crate::domain::scheduling_model::workflow::workflow::Workflow;
use crate::error::Result;

/// Key figures of one schedule. Each instance is one row of the statistics file, so the
/// field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStatistics {
    pub workflow_id: String,
    pub algorithm: String,
    pub simulation_number: u32,
    pub number_of_tasks: usize,

    pub makespan: f64,

    /// Critical path length without transfers, the lower bound of every schedule.
    pub theoretical_duration: f64,

    /// `theoretical_duration / makespan`, 1.0 is optimal.
    pub efficiency: f64,

    /// Total execution time divided by the makespan.
    pub speedup: f64,

    /// Busy time of all workers divided by `makespan * number of workers`.
    pub utilization: f64,

    /// Transfer time of all edges whose endpoints run on different workers.
    pub transfer_time_paid: f64,

    /// Busy seconds priced with each worker's hourly rate; workers without a rate are free.
    pub cost: f64,

    pub workers_used: usize,
    pub workers_available: usize,
    pub verification_violations: usize,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 { numerator / denominator } else { 0.0 }
}

impl ScheduleStatistics {
    pub fn collect(workflow: &Workflow, schedule: &Schedule, theoretical_duration: f64) -> Self {
        let makespan = schedule.makespan();
        let busy_time: f64 = schedule.workers.iter().map(|worker| worker.time).sum();

        let transfer_time_paid = (0..workflow.len())
            .flat_map(|task| workflow.successors(task).iter().map(move |edge| (task, edge)))
            .filter(|(task, edge)| {
                let source = schedule.worker_of(&workflow.task_at(*task).id);
                let target = schedule.worker_of(&workflow.task_at(edge.task).id);
                source.is_some() && target.is_some() && source != target
            })
            .map(|(_, edge)| edge.transfer_time)
            .sum();

        let cost = schedule.workers.iter().filter_map(|worker| worker.cost()).sum();

        ScheduleStatistics {
            workflow_id: workflow.id.to_string(),
            algorithm: schedule.algorithm.to_string(),
            simulation_number: 0,
            number_of_tasks: workflow.len(),
            makespan,
            theoretical_duration,
            efficiency: ratio(theoretical_duration, makespan),
            speedup: ratio(workflow.total_execution_time(), makespan),
            utilization: ratio(busy_time, makespan * schedule.workers.len() as f64),
            transfer_time_paid,
            cost,
            workers_used: schedule.used_workers(),
            workers_available: schedule.workers.len(),
            verification_violations: schedule.verification.violation_count(),
        }
    }

    pub fn for_simulation(mut self, simulation_number: u32) -> Self {
        self.simulation_number = simulation_number;
        self
    }
}

/// `;` separated statistics file with a header row.
pub struct StatisticsWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl StatisticsWriter<File> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(StatisticsWriter::from_writer(File::create(path)?))
    }
}

impl<W: Write> StatisticsWriter<W> {
    pub fn from_writer(writer: W) -> Self {
        StatisticsWriter { writer: csv::WriterBuilder::new().delimiter(b';').from_writer(writer) }
    }

    pub fn write(&mut self, statistics: &ScheduleStatistics) -> Result<()> {
        self.writer.serialize(statistics)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scheduling_model::resource::worker::Worker;
    use crate::domain::scheduling_model::scheduler::heft_workflow_scheduler::schedule_heft;
    use crate::domain::scheduling_model::workflow::task::Task;

    fn fork() -> Workflow {
        Workflow::new(
            "fork",
            "Fork",
            vec![Task::new("A", "A", 2.0).connect("B", 1.0).connect("C", 1.0), Task::new("B", "B", 4.0), Task::new("C", "C", 4.0)],
        )
        .unwrap()
    }

    #[test]
    fn statistics_of_a_two_worker_schedule() {
        let workflow = fork();
        let workers = vec![Worker::new("w1").with_cost_per_hour(3600.0), Worker::new("w2")];
        let schedule = schedule_heft(&workflow, &workers, true).unwrap();

        // A and C on w1 [0, 6), B on w2 [3, 7).
        let statistics = ScheduleStatistics::collect(&workflow, &schedule, 6.0).for_simulation(3);

        assert_eq!(statistics.simulation_number, 3);
        assert_eq!(statistics.makespan, 7.0);
        assert_eq!(statistics.transfer_time_paid, 1.0);
        assert_eq!(statistics.workers_used, 2);
        assert_eq!(statistics.cost, 6.0);
        assert!((statistics.efficiency - 6.0 / 7.0).abs() < 1e-9);
        assert!((statistics.speedup - 10.0 / 7.0).abs() < 1e-9);
        assert!((statistics.utilization - 10.0 / 14.0).abs() < 1e-9);
        assert_eq!(statistics.verification_violations, 0);
    }

    #[test]
    fn rows_are_semicolon_separated_with_header() {
        let workflow = fork();
        let schedule = schedule_heft(&workflow, &[Worker::new("w1")], false).unwrap();
        let statistics = ScheduleStatistics::collect(&workflow, &schedule, 6.0);

        let mut writer = StatisticsWriter::from_writer(Vec::new());
        writer.write(&statistics).unwrap();
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let mut lines = output.lines();

        assert!(lines.next().unwrap().starts_with("workflowId;algorithm;simulationNumber;numberOfTasks;makespan"));
        assert!(lines.next().unwrap().starts_with("fork;HEFT;0;3;10"));
    }
}
