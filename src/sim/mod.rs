/// CPU scheduling simulator that produces the results table.
///
/// ```text
///   workload (Vec<Process>)
///        │
///        ▼
///   ┌────────────┐
///   │ algorithms  │  FCFS / SJF / SRTF / RR / Priority → Schedule
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ metrics   │  averages, utilisation, throughput → results.csv
///   └──────────┘
/// ```

pub mod algorithms;
pub mod metrics;
pub mod process;

use crate::error::SimError;
use algorithms::{Algorithm, Schedule};
use metrics::SchedulingMetrics;
use process::Process;

/// Run every policy of the suite over `processes`, in suite order.
pub fn compare(
    processes: &[Process],
    quantum: u32,
) -> Result<Vec<(Schedule, SchedulingMetrics)>, SimError> {
    Algorithm::suite(quantum)
        .iter()
        .map(|algorithm| {
            let schedule = algorithm.run(processes)?;
            let metrics = SchedulingMetrics::from_schedule(&schedule);
            log::debug!("{algorithm}: total time {}", schedule.total_time);
            Ok((schedule, metrics))
        })
        .collect()
}
