use std::collections::HashMap;

use crate::api::workflow_dto::task_dto::{ConnectionDto, GammaDistributionDto, TaskDto};
use crate::api::workflow_dto::workflow_dto::WorkflowDto;
use crate::domain::scheduling_model::utils::id::{TaskId, WorkflowId};
use crate::domain::scheduling_model::workflow::dependency::{Connection, Edge};
use crate::domain::scheduling_model::workflow::sampler::DurationSampler;
use crate::domain::scheduling_model::workflow::task::{GammaParameters, Task};
use crate::error::{Error, Result};

/// A named DAG of tasks.
///
/// Tasks keep their input order; that order is the base of every deterministic tie-break.
/// Adjacency is kept twice, index based, so that the algorithms never have to look up ids.
#[derive(Debug, Clone)]
pub struct Workflow {
    pub id: WorkflowId,
    pub name: String,

    tasks: Vec<Task>,
    index: HashMap<TaskId, usize>,
    successors: Vec<Vec<Edge>>,
    predecessors: Vec<Vec<Edge>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

fn check_duration(element: impl FnOnce() -> String, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidDuration { element: element(), value })
    }
}

impl Workflow {
    /// Builds and validates a workflow.
    ///
    /// Rejects duplicate ids, negative or non-finite durations, self loops and connections to
    /// unknown tasks. A repeated (source, target) connection overwrites the earlier one.
    /// Cycles are accepted here and reported by `topological_order`.
    pub fn new(id: impl Into<String>, name: impl Into<String>, tasks: Vec<Task>) -> Result<Self> {
        let mut index = HashMap::with_capacity(tasks.len());
        for (position, task) in tasks.iter().enumerate() {
            if index.insert(task.id.clone(), position).is_some() {
                return Err(Error::DuplicateTaskId(task.id.to_string()));
            }
            check_duration(|| task.id.to_string(), task.execution_time)?;
        }

        let mut normalized_tasks = Vec::with_capacity(tasks.len());
        for mut task in tasks {
            let mut connections: Vec<Connection> = Vec::with_capacity(task.connections.len());

            for mut connection in std::mem::take(&mut task.connections) {
                connection.source = task.id.clone();

                if connection.target == task.id {
                    return Err(Error::SelfLoop(task.id.to_string()));
                }
                if !index.contains_key(&connection.target) {
                    return Err(Error::UnknownTaskReference {
                        source_task: task.id.to_string(),
                        target_task: connection.target.to_string(),
                    });
                }
                check_duration(|| format!("{} -> {}", task.id, connection.target), connection.transfer_time)?;

                match connections.iter_mut().find(|existing| existing.target == connection.target) {
                    Some(existing) => {
                        log::warn!(
                            "Duplicate connection '{}' -> '{}', keeping the later transfer time {} (was {}).",
                            task.id,
                            connection.target,
                            connection.transfer_time,
                            existing.transfer_time
                        );
                        *existing = connection;
                    }
                    None => connections.push(connection),
                }
            }

            task.connections = connections;
            normalized_tasks.push(task);
        }

        let mut workflow = Workflow {
            id: WorkflowId::new(id),
            name: name.into(),
            tasks: normalized_tasks,
            index,
            successors: Vec::new(),
            predecessors: Vec::new(),
        };
        workflow.rebuild_adjacency();

        match workflow.levels() {
            Ok(levels) => {
                for (task, level) in workflow.tasks.iter_mut().zip(levels) {
                    task.level = level;
                }
            }
            Err(e) => log::debug!("Levels of workflow '{}' not computed: {}", workflow.id, e),
        }

        Ok(workflow)
    }

    fn rebuild_adjacency(&mut self) {
        let mut successors = vec![Vec::new(); self.tasks.len()];
        let mut predecessors = vec![Vec::new(); self.tasks.len()];

        for (source, task) in self.tasks.iter().enumerate() {
            for connection in &task.connections {
                let target = self.index[&connection.target];
                successors[source].push(Edge { task: target, transfer_time: connection.transfer_time });
                predecessors[target].push(Edge { task: source, transfer_time: connection.transfer_time });
            }
        }

        self.successors = successors;
        self.predecessors = predecessors;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task_at(&self, position: usize) -> &Task {
        &self.tasks[position]
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.index.get(id).map(|position| &self.tasks[*position])
    }

    pub fn index_of(&self, id: &TaskId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn successors(&self, position: usize) -> &[Edge] {
        &self.successors[position]
    }

    pub fn predecessors(&self, position: usize) -> &[Edge] {
        &self.predecessors[position]
    }

    /// Transfer time of the connection `source -> target`, if it exists.
    pub fn transfer_time(&self, source: &TaskId, target: &TaskId) -> Option<f64> {
        self.task(source)?.connections.iter().find(|c| &c.target == target).map(|c| c.transfer_time)
    }

    /// Positions of all tasks without predecessors.
    pub fn entry_tasks(&self) -> Vec<usize> {
        (0..self.tasks.len()).filter(|position| self.predecessors[*position].is_empty()).collect()
    }

    /// Positions of all tasks without successors.
    pub fn exit_tasks(&self) -> Vec<usize> {
        (0..self.tasks.len()).filter(|position| self.successors[*position].is_empty()).collect()
    }

    pub fn total_execution_time(&self) -> f64 {
        self.tasks.iter().map(|task| task.execution_time).sum()
    }

    /// Reverse DFS post-order over the task positions.
    ///
    /// Roots and successors are visited in input order, so the result is deterministic.
    /// Fails with `Error::CycleDetected` listing the tasks on the cycle.
    pub fn topological_order(&self) -> Result<Vec<usize>> {
        let n = self.tasks.len();
        let mut state = vec![VisitState::Unvisited; n];
        let mut post_order = Vec::with_capacity(n);

        for root in 0..n {
            if state[root] != VisitState::Unvisited {
                continue;
            }

            // (task, index of the next successor to visit)
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
            state[root] = VisitState::InProgress;

            while let Some((current, next_child)) = stack.last_mut() {
                let current = *current;
                match self.successors[current].get(*next_child) {
                    Some(edge) => {
                        *next_child += 1;
                        match state[edge.task] {
                            VisitState::Unvisited => {
                                state[edge.task] = VisitState::InProgress;
                                stack.push((edge.task, 0));
                            }
                            VisitState::InProgress => {
                                let path: Vec<usize> = stack.iter().map(|(task, _)| *task).collect();
                                return Err(self.cycle_error(&path, edge.task));
                            }
                            VisitState::Done => {}
                        }
                    }
                    None => {
                        state[current] = VisitState::Done;
                        post_order.push(current);
                        stack.pop();
                    }
                }
            }
        }

        post_order.reverse();
        Ok(post_order)
    }

    /// `path` is the chain of in-progress tasks, `closing` the task reached a second time.
    fn cycle_error(&self, path: &[usize], closing: usize) -> Error {
        let start = path.iter().position(|task| *task == closing).unwrap_or(0);
        let mut cycle: Vec<String> = path[start..].iter().map(|task| self.tasks[*task].id.to_string()).collect();
        cycle.push(self.tasks[closing].id.to_string());
        Error::CycleDetected { cycle }
    }

    /// Topological depth of every task; entry tasks have level 0.
    pub fn levels(&self) -> Result<Vec<usize>> {
        let order = self.topological_order()?;
        let mut levels = vec![0; self.tasks.len()];

        for task in order {
            for edge in &self.successors[task] {
                levels[edge.task] = levels[edge.task].max(levels[task] + 1);
            }
        }
        Ok(levels)
    }

    /// Computes the upward rank of every task.
    ///
    /// `rank(v) = execution_time(v) + max over successors s of (transfer_time(v, s) + rank(s))`,
    /// with the transfer term dropped if `include_transfer_times` is false. Sinks have
    /// `rank = execution_time`.
    ///
    /// Memoized depth-first evaluation with an explicit stack. A task reached again while it is
    /// still being evaluated closes a cycle and yields `Error::CycleDetected`.
    pub fn calculate_upward_rank(&self, include_transfer_times: bool) -> Result<Vec<f64>> {
        let n = self.tasks.len();
        let mut state = vec![VisitState::Unvisited; n];
        let mut rank = vec![0.0; n];

        for root in 0..n {
            if state[root] == VisitState::Done {
                continue;
            }

            let mut queue = vec![root];
            let mut path: Vec<usize> = Vec::new();

            while let Some(next_key) = queue.last().copied() {
                match state[next_key] {
                    VisitState::Done => {
                        queue.pop();
                    }
                    VisitState::Unvisited => {
                        state[next_key] = VisitState::InProgress;
                        path.push(next_key);

                        for edge in &self.successors[next_key] {
                            match state[edge.task] {
                                VisitState::Unvisited => queue.push(edge.task),
                                VisitState::InProgress => return Err(self.cycle_error(&path, edge.task)),
                                VisitState::Done => {}
                            }
                        }
                    }
                    VisitState::InProgress => {
                        // Every successor was pushed above this entry and is finished by now.
                        let successor_rank = self.successors[next_key]
                            .iter()
                            .map(|edge| {
                                let communication_time = if include_transfer_times { edge.transfer_time } else { 0.0 };
                                communication_time + rank[edge.task]
                            })
                            .fold(0.0, f64::max);

                        rank[next_key] = self.tasks[next_key].execution_time + successor_rank;
                        state[next_key] = VisitState::Done;
                        path.pop();
                        queue.pop();
                    }
                }
            }
        }

        Ok(rank)
    }

    /// Sets the transfer time of every connection between consecutive tasks of `path` to zero
    /// and drops its transfer distribution, so later sampling keeps it at zero.
    ///
    /// Critical path tasks are expected to run back to back on one worker, so their
    /// communication is free. Mutates the workflow in place and returns the number of
    /// connections that were changed. Fails with `Error::UnknownTask` before changing anything
    /// if `path` names a task outside the workflow.
    pub fn zero_critical_path_transfers(&mut self, path: &[TaskId]) -> Result<usize> {
        if let Some(unknown) = path.iter().find(|task_id| !self.index.contains_key(*task_id)) {
            return Err(Error::UnknownTask(unknown.to_string()));
        }

        let mut zeroed = 0;
        for pair in path.windows(2) {
            let source = self.index[&pair[0]];
            if let Some(connection) = self.tasks[source].connections.iter_mut().find(|c| c.target == pair[1]) {
                if connection.transfer_time != 0.0 || connection.transfer_distribution.is_some() {
                    connection.transfer_time = 0.0;
                    connection.transfer_distribution = None;
                    zeroed += 1;
                }
            }
        }

        if zeroed > 0 {
            self.rebuild_adjacency();
            log::debug!("Zeroed {} critical path transfer(s) in workflow '{}'.", zeroed, self.id);
        }
        Ok(zeroed)
    }

    /// Copy of the workflow with every distributed duration replaced by its mean.
    pub fn with_expected_durations(&self) -> Workflow {
        self.map_durations(|task| task.expected_execution_time(), |connection| connection.expected_transfer_time())
    }

    /// Copy of the workflow with every distributed duration drawn from `sampler`.
    /// Fixed durations are kept as they are.
    pub fn sample_durations(&self, sampler: &mut dyn DurationSampler) -> Workflow {
        let mut sampled = self.clone();

        for task in &mut sampled.tasks {
            if let Some(distribution) = task.duration_distribution {
                task.execution_time = sanitize(sampler.sample(&distribution));
            }
            for connection in &mut task.connections {
                if let Some(distribution) = connection.transfer_distribution {
                    connection.transfer_time = sanitize(sampler.sample(&distribution));
                }
            }
        }

        sampled.rebuild_adjacency();
        sampled
    }

    fn map_durations(&self, task_time: impl Fn(&Task) -> f64, transfer_time: impl Fn(&Connection) -> f64) -> Workflow {
        let mut mapped = self.clone();

        for task in &mut mapped.tasks {
            task.execution_time = sanitize(task_time(task));
            for connection in &mut task.connections {
                connection.transfer_time = sanitize(transfer_time(connection));
            }
        }

        mapped.rebuild_adjacency();
        mapped
    }

    pub fn to_dto(&self) -> WorkflowDto {
        let to_distribution_dto = |d: GammaParameters| GammaDistributionDto { shape: d.shape, scale: d.scale };

        WorkflowDto {
            id: self.id.to_string(),
            name: self.name.clone(),
            tasks: self
                .tasks
                .iter()
                .map(|task| TaskDto {
                    id: task.id.to_string(),
                    name: Some(task.name.clone()),
                    execution_time: task.execution_time,
                    duration_distribution: task.duration_distribution.map(to_distribution_dto),
                    connections: task
                        .connections
                        .iter()
                        .map(|connection| ConnectionDto {
                            target_node_id: connection.target.to_string(),
                            transfer_time: connection.transfer_time,
                            transfer_distribution: connection.transfer_distribution.map(to_distribution_dto),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Constructs a validated Workflow graph from a WorkflowDto.
impl TryFrom<WorkflowDto> for Workflow {
    type Error = Error;

    fn try_from(dto: WorkflowDto) -> Result<Self> {
        let name = if dto.name.is_empty() { dto.id.clone() } else { dto.name };

        let tasks = dto
            .tasks
            .into_iter()
            .map(|task_dto| {
                let id = TaskId::new(task_dto.id);
                let connections = task_dto
                    .connections
                    .into_iter()
                    .map(|connection_dto| Connection {
                        source: id.clone(),
                        target: TaskId::new(connection_dto.target_node_id),
                        transfer_time: connection_dto.transfer_time,
                        transfer_distribution: connection_dto.transfer_distribution.map(|d| GammaParameters::new(d.shape, d.scale)),
                    })
                    .collect();

                Task {
                    name: task_dto.name.unwrap_or_else(|| id.to_string()),
                    id,
                    execution_time: task_dto.execution_time,
                    duration_distribution: task_dto.duration_distribution.map(|d| GammaParameters::new(d.shape, d.scale)),
                    level: 0,
                    connections,
                }
            })
            .collect();

        Workflow::new(dto.id, name, tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Workflow {
        Workflow::new(
            "diamond",
            "Diamond",
            vec![
                Task::new("A", "A", 2.0).connect("B", 1.0).connect("C", 4.0),
                Task::new("B", "B", 3.0).connect("D", 1.0),
                Task::new("C", "C", 1.0).connect("D", 1.0),
                Task::new("D", "D", 2.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn topological_order_respects_every_edge() {
        let workflow = diamond();
        let order = workflow.topological_order().unwrap();
        let position: HashMap<usize, usize> = order.iter().enumerate().map(|(i, task)| (*task, i)).collect();

        for task in 0..workflow.len() {
            for edge in workflow.successors(task) {
                assert!(position[&task] < position[&edge.task]);
            }
        }
        assert_eq!(order[0], 0);
    }

    #[test]
    fn levels_are_stamped_on_construction() {
        let workflow = diamond();
        let levels: Vec<usize> = workflow.tasks().iter().map(|task| task.level).collect();
        assert_eq!(levels, vec![0, 1, 1, 2]);
    }

    #[test]
    fn upward_rank_with_and_without_transfers() {
        let workflow = diamond();

        let ranks = workflow.calculate_upward_rank(true).unwrap();
        // D = 2, B = 3 + 1 + 2, C = 1 + 1 + 2, A = 2 + max(1 + 6, 4 + 4)
        assert_eq!(ranks, vec![10.0, 6.0, 4.0, 2.0]);

        let ranks = workflow.calculate_upward_rank(false).unwrap();
        assert_eq!(ranks, vec![7.0, 5.0, 3.0, 2.0]);
    }

    #[test]
    fn duplicate_connection_overwrites_transfer_time() {
        let workflow = Workflow::new("dup", "Dup", vec![Task::new("A", "A", 1.0).connect("B", 5.0).connect("B", 2.0), Task::new("B", "B", 1.0)]).unwrap();

        assert_eq!(workflow.task_at(0).connections.len(), 1);
        assert_eq!(workflow.transfer_time(&TaskId::new("A"), &TaskId::new("B")), Some(2.0));
        assert_eq!(workflow.predecessors(1).len(), 1);
    }

    #[test]
    fn malformed_graphs_are_rejected_with_identifiers() {
        let unknown = Workflow::new("x", "x", vec![Task::new("A", "A", 1.0).connect("Z", 1.0)]).unwrap_err();
        assert!(matches!(&unknown, Error::UnknownTaskReference { source_task, target_task } if source_task == "A" && target_task == "Z"));
        assert!(unknown.is_malformed_graph());

        let self_loop = Workflow::new("x", "x", vec![Task::new("A", "A", 1.0).connect("A", 1.0)]).unwrap_err();
        assert!(matches!(self_loop, Error::SelfLoop(id) if id == "A"));

        let negative = Workflow::new("x", "x", vec![Task::new("A", "A", -1.0)]).unwrap_err();
        assert!(matches!(negative, Error::InvalidDuration { .. }));

        let duplicate = Workflow::new("x", "x", vec![Task::new("A", "A", 1.0), Task::new("A", "A2", 1.0)]).unwrap_err();
        assert!(matches!(duplicate, Error::DuplicateTaskId(id) if id == "A"));
    }

    #[test]
    fn cycle_is_reported_by_sort_and_rank() {
        let workflow = Workflow::new(
            "cycle",
            "Cycle",
            vec![Task::new("A", "A", 1.0).connect("B", 1.0), Task::new("B", "B", 1.0).connect("A", 1.0)],
        )
        .unwrap();

        match workflow.topological_order() {
            Err(Error::CycleDetected { cycle }) => assert_eq!(cycle, vec!["A", "B", "A"]),
            other => panic!("expected a cycle, got {:?}", other),
        }
        assert!(matches!(workflow.calculate_upward_rank(true), Err(Error::CycleDetected { .. })));
    }

    #[test]
    fn zeroing_critical_transfers_only_touches_path_edges() {
        let mut workflow = diamond();
        let path = vec![TaskId::new("A"), TaskId::new("C"), TaskId::new("D")];

        assert_eq!(workflow.zero_critical_path_transfers(&path).unwrap(), 2);
        assert_eq!(workflow.transfer_time(&TaskId::new("A"), &TaskId::new("C")), Some(0.0));
        assert_eq!(workflow.transfer_time(&TaskId::new("C"), &TaskId::new("D")), Some(0.0));
        assert_eq!(workflow.transfer_time(&TaskId::new("A"), &TaskId::new("B")), Some(1.0));
        assert_eq!(workflow.successors(0)[1].transfer_time, 0.0);
    }

    #[test]
    fn zeroed_transfers_stay_zero_after_sampling() {
        let mut source = Task::new("A", "A", 2.0).connect("B", 1.0);
        source.connections[0].transfer_distribution = Some(GammaParameters::new(2.0, 2.0));
        let mut workflow = Workflow::new("gamma", "Gamma", vec![source, Task::new("B", "B", 1.0)]).unwrap();
        let (a, b) = (TaskId::new("A"), TaskId::new("B"));

        assert_eq!(workflow.zero_critical_path_transfers(&[a.clone(), b.clone()]).unwrap(), 1);

        assert_eq!(workflow.with_expected_durations().transfer_time(&a, &b), Some(0.0));
        let sampled = workflow.sample_durations(&mut crate::domain::scheduling_model::workflow::sampler::SeededGammaSampler::new(7));
        assert_eq!(sampled.transfer_time(&a, &b), Some(0.0));
    }

    #[test]
    fn zeroing_rejects_unknown_path_tasks_without_changes() {
        let mut workflow = diamond();
        let path = vec![TaskId::new("A"), TaskId::new("C"), TaskId::new("Ghost")];

        assert!(matches!(workflow.zero_critical_path_transfers(&path), Err(Error::UnknownTask(id)) if id == "Ghost"));
        assert_eq!(workflow.transfer_time(&TaskId::new("A"), &TaskId::new("C")), Some(4.0));
    }

    #[test]
    fn expected_durations_use_distribution_means() {
        let workflow = Workflow::new(
            "gamma",
            "Gamma",
            vec![Task::new("A", "A", 1.0).with_distribution(GammaParameters::new(2.0, 5.0)), Task::new("B", "B", 3.0)],
        )
        .unwrap();

        let expected = workflow.with_expected_durations();
        assert_eq!(expected.task_at(0).execution_time, 10.0);
        assert_eq!(expected.task_at(1).execution_time, 3.0);
    }
}
