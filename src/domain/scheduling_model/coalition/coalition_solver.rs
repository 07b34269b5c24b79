use std::collections::HashSet;
use std::fmt::Debug;

use crate::domain::scheduling_model::coalition::subset_values::SubsetValues;
use crate::error::{Error, Result};

/// Coalitions of 1-indexed agents.
pub type Partition = Vec<Vec<usize>>;

/// Optimal coalition structure generation over a value table with `2^num_agents` entries.
///
/// Implementations return a partition of the agents `1..=num_agents`; the caller validates it.
pub trait CoalitionSolver: Debug {
    fn solve(&self, num_agents: usize, values: &[f64]) -> Result<Partition>;
}

/// Every agent `1..=num_agents` must appear in exactly one coalition.
pub fn validate_partition(partition: &[Vec<usize>], num_agents: usize) -> Result<()> {
    let mut seen = HashSet::with_capacity(num_agents);

    for agent in partition.iter().flatten().copied() {
        if agent == 0 || agent > num_agents {
            return Err(Error::SolverFailure(format!("agent {} is out of range 1..={}", agent, num_agents)));
        }
        if !seen.insert(agent) {
            return Err(Error::SolverFailure(format!("agent {} appears in more than one coalition", agent)));
        }
    }

    if seen.len() != num_agents {
        let missing: Vec<usize> = (1..=num_agents).filter(|agent| !seen.contains(agent)).collect();
        return Err(Error::SolverFailure(format!("agents {:?} are not part of any coalition", missing)));
    }

    Ok(())
}

/// Runs `solver` on `subset_values`. Every solver error and every malformed partition is
/// reported as `Error::SolverFailure`; no partition is made up in that case.
pub fn solve_coalition_structure(solver: &dyn CoalitionSolver, subset_values: &SubsetValues) -> Result<Partition> {
    let num_agents = subset_values.num_agents();
    if num_agents == 0 {
        return Ok(Vec::new());
    }

    let expected_len = 1usize << num_agents;
    if subset_values.values.len() != expected_len {
        return Err(Error::SolverFailure(format!(
            "value table has {} entries, expected {} for {} agents",
            subset_values.values.len(),
            expected_len,
            num_agents
        )));
    }

    let partition = solver.solve(num_agents, &subset_values.values).map_err(|e| match e {
        Error::SolverFailure(message) => Error::SolverFailure(message),
        other => Error::SolverFailure(other.to_string()),
    })?;

    validate_partition(&partition, num_agents)?;
    log::debug!("{:?} split {} agent(s) into {} coalition(s): {:?}", solver, num_agents, partition.len(), partition);

    Ok(partition)
}

/// Largest agent count `DynamicProgrammingSolver` accepts (`3^16` submask steps).
pub const MAX_DP_AGENTS: usize = 16;

/**
 * Exact coalition structure generation by dynamic programming over subsets.
 *
 * For every set of agents the best structure is either the set as a single coalition or
 * a coalition containing its lowest agent plus the best structure of the rest. On equal
 * values the structure with fewer coalitions is kept.
 */
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicProgrammingSolver;

impl CoalitionSolver for DynamicProgrammingSolver {
    fn solve(&self, num_agents: usize, values: &[f64]) -> Result<Partition> {
        if num_agents > MAX_DP_AGENTS {
            return Err(Error::SolverFailure(format!("{} agents exceed the dynamic programming limit of {}", num_agents, MAX_DP_AGENTS)));
        }

        let size = 1usize << num_agents;
        if values.len() != size {
            return Err(Error::SolverFailure(format!("expected {} values, got {}", size, values.len())));
        }

        let mut best = vec![0.0; size];
        let mut split = vec![0usize; size];

        for mask in 1..size {
            let lowest = mask & mask.wrapping_neg();
            let rest = mask ^ lowest;

            // Submasks of `rest` from the largest down, so the whole set is tried first.
            let mut sub = rest;
            let mut best_value = f64::NEG_INFINITY;
            let mut best_coalition = mask;
            loop {
                let coalition = sub | lowest;
                let value = values[coalition] + best[mask ^ coalition];
                if value > best_value {
                    best_value = value;
                    best_coalition = coalition;
                }
                if sub == 0 {
                    break;
                }
                sub = (sub - 1) & rest;
            }

            best[mask] = best_value;
            split[mask] = best_coalition;
        }

        let mut partition = Vec::new();
        let mut remaining = size - 1;
        while remaining != 0 {
            let coalition = split[remaining];
            partition.push((0..num_agents).filter(|agent| coalition & (1 << agent) != 0).map(|agent| agent + 1).collect());
            remaining ^= coalition;
        }

        Ok(partition)
    }
}
