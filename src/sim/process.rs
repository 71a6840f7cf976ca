use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::SimError;

/// One process of a workload. Times are in abstract integer units; a lower
/// `priority` number means a more urgent process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Process {
    pub id: u32,
    pub arrival: u32,
    pub burst: u32,
    pub priority: u32,
}

impl Process {
    pub fn new(id: u32, arrival: u32, burst: u32, priority: u32) -> Self {
        Self {
            id,
            arrival,
            burst,
            priority,
        }
    }
}

/// Per-process timing after a schedule has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub id: u32,
    pub arrival: u32,
    pub burst: u32,
    pub completion: u32,
    /// `completion - arrival`
    pub turnaround: u32,
    /// `turnaround - burst`
    pub waiting: u32,
    /// First dispatch minus arrival.
    pub response: u32,
}

impl ProcessOutcome {
    pub(crate) fn new(process: &Process, first_run: u32, completion: u32) -> Self {
        let turnaround = completion - process.arrival;
        Self {
            id: process.id,
            arrival: process.arrival,
            burst: process.burst,
            completion,
            turnaround,
            waiting: turnaround - process.burst,
            response: first_run - process.arrival,
        }
    }
}

/// Four-process demonstration workload.
pub fn default_workload() -> Vec<Process> {
    vec![
        Process::new(1, 0, 6, 2),
        Process::new(2, 2, 4, 1),
        Process::new(3, 4, 8, 3),
        Process::new(4, 6, 3, 4),
    ]
}

/// Read a workload CSV with the header `id,arrival,burst,priority`.
pub fn load_workload(path: &Path) -> Result<Vec<Process>, SimError> {
    let workload_err = |source| SimError::Workload {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(workload_err)?;
    let processes = reader
        .deserialize()
        .collect::<Result<Vec<Process>, _>>()
        .map_err(workload_err)?;

    validate(&processes)?;
    log::info!("Loaded {} processes from {}", processes.len(), path.display());
    Ok(processes)
}

/// Reject workloads the schedulers cannot finish.
pub fn validate(processes: &[Process]) -> Result<(), SimError> {
    if processes.is_empty() {
        return Err(SimError::EmptyWorkload);
    }
    let mut seen = BTreeSet::new();
    let mut total_burst: u32 = 0;
    let mut last_arrival: u32 = 0;
    for p in processes {
        if p.burst == 0 {
            return Err(SimError::ZeroBurst { id: p.id });
        }
        if !seen.insert(p.id) {
            return Err(SimError::DuplicateId { id: p.id });
        }
        total_burst = total_burst
            .checked_add(p.burst)
            .ok_or(SimError::TimeOverflow)?;
        last_arrival = last_arrival.max(p.arrival);
    }
    // Every completion happens by the last arrival plus all work.
    last_arrival
        .checked_add(total_burst)
        .ok_or(SimError::TimeOverflow)?;
    Ok(())
}
