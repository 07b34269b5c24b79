use std::fmt;
use std::str::FromStr;

use crate::domain::scheduling_model::coalition::coalition_solver::DynamicProgrammingSolver;
use crate::domain::scheduling_model::scheduler::cp_heft_workflow_scheduler::CpHeftWorkflowScheduler;
use crate::domain::scheduling_model::scheduler::greedy_workflow_scheduler::GreedyWorkflowScheduler;
use crate::domain::scheduling_model::scheduler::heft_workflow_scheduler::HeftWorkflowScheduler;
use crate::domain::scheduling_model::scheduler::odp_ip_workflow_scheduler::OdpIpWorkflowScheduler;
use crate::domain::scheduling_model::scheduler::workflow_scheduler::{TieBreak, WorkflowScheduler};
use crate::error::ConversionError;

/// The available workflow scheduling algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorkflowSchedulerType {
    /// First come first served list scheduling, appending to the earliest finishing worker.
    Greedy,
    /// **Heterogeneous Earliest Finish Time**: upward rank priority, insertion based EFT placement.
    Heft,
    /// HEFT with all critical path tasks pinned to the critical path worker.
    CpHeft,
    /// Critical path on one worker, the remaining tasks grouped into coalitions by an
    /// optimal coalition structure solver, one worker per coalition.
    OdpIp,
}

impl WorkflowSchedulerType {
    pub const ALL: [WorkflowSchedulerType; 4] =
        [WorkflowSchedulerType::Greedy, WorkflowSchedulerType::Heft, WorkflowSchedulerType::CpHeft, WorkflowSchedulerType::OdpIp];

    /// Factory method to return a concrete [`WorkflowScheduler`] for the enum variant.
    /// ODP-IP is backed by the bundled [`DynamicProgrammingSolver`].
    pub fn get_instance(&self, include_transfer_times: bool, tie_break: TieBreak) -> Box<dyn WorkflowScheduler> {
        match self {
            WorkflowSchedulerType::Greedy => Box::new(GreedyWorkflowScheduler::new(tie_break)),
            WorkflowSchedulerType::Heft => Box::new(HeftWorkflowScheduler::new(include_transfer_times)),
            WorkflowSchedulerType::CpHeft => Box::new(CpHeftWorkflowScheduler::new(include_transfer_times)),
            WorkflowSchedulerType::OdpIp => Box::new(OdpIpWorkflowScheduler::new(include_transfer_times, Box::new(DynamicProgrammingSolver))),
        }
    }
}

impl fmt::Display for WorkflowSchedulerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowSchedulerType::Greedy => "Greedy",
            WorkflowSchedulerType::Heft => "HEFT",
            WorkflowSchedulerType::CpHeft => "CP-HEFT",
            WorkflowSchedulerType::OdpIp => "ODP-IP",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for WorkflowSchedulerType {
    type Err = ConversionError;

    fn from_str(scheduler_type: &str) -> Result<WorkflowSchedulerType, Self::Err> {
        match scheduler_type.trim().to_ascii_uppercase().as_str() {
            "GREEDY" | "FCFS" => Ok(WorkflowSchedulerType::Greedy),
            "HEFT" => Ok(WorkflowSchedulerType::Heft),
            "CP-HEFT" | "CPHEFT" => Ok(WorkflowSchedulerType::CpHeft),
            "ODP-IP" | "ODPIP" => Ok(WorkflowSchedulerType::OdpIp),
            _ => Err(ConversionError::UnknownSchedulerType(scheduler_type.to_string())),
        }
    }
}
