use std::fmt::Write as _;
use std::path::Path;

use super::algorithms::Schedule;
use super::process::ProcessOutcome;
use crate::data::metrics::{Metric, ALGORITHM_COLUMN};
use crate::error::SimError;

/// Aggregate performance of one schedule; one row of the results table.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingMetrics {
    pub algorithm: String,
    pub avg_turnaround: f64,
    pub avg_waiting: f64,
    pub avg_response: f64,
    /// Busy share of `[0, total_time]`, in percent.
    pub cpu_utilization: f64,
    /// Processes completed per time unit.
    pub throughput: f64,
}

impl SchedulingMetrics {
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let n = schedule.outcomes.len().max(1) as f64;
        let sum = |f: fn(&ProcessOutcome) -> u32| -> f64 {
            schedule.outcomes.iter().map(|o| f(o) as f64).sum()
        };
        let total_burst = sum(|o| o.burst);
        let total_time = schedule.total_time.max(1) as f64;

        Self {
            algorithm: schedule.algorithm.name().to_string(),
            avg_turnaround: sum(|o| o.turnaround) / n,
            avg_waiting: sum(|o| o.waiting) / n,
            avg_response: sum(|o| o.response) / n,
            cpu_utilization: total_burst / total_time * 100.0,
            throughput: schedule.outcomes.len() as f64 / total_time,
        }
    }
}

/// Header row of the results table, in file order.
pub fn results_header() -> [&'static str; 6] {
    [
        ALGORITHM_COLUMN,
        Metric::AverageTurnaround.column_name(),
        Metric::AverageWaiting.column_name(),
        Metric::AverageResponse.column_name(),
        Metric::CpuUtilization.column_name(),
        Metric::Throughput.column_name(),
    ]
}

/// Write one row per algorithm with every value fixed to two decimals.
pub fn write_results_csv(path: &Path, rows: &[SchedulingMetrics]) -> Result<(), SimError> {
    let output_err = |source| SimError::Output {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(output_err)?;
    writer.write_record(results_header()).map_err(output_err)?;
    for m in rows {
        writer
            .write_record([
                m.algorithm.clone(),
                format!("{:.2}", m.avg_turnaround),
                format!("{:.2}", m.avg_waiting),
                format!("{:.2}", m.avg_response),
                format!("{:.2}", m.cpu_utilization),
                format!("{:.2}", m.throughput),
            ])
            .map_err(output_err)?;
    }
    writer
        .flush()
        .map_err(|e| output_err(csv::Error::from(e)))?;

    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Per-process timing table, tab separated.
pub fn process_table(schedule: &Schedule) -> String {
    let mut out = String::from("PID\tAT\tBT\tCT\tTAT\tWT\tRT\n");
    for o in &schedule.outcomes {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            o.id, o.arrival, o.burst, o.completion, o.turnaround, o.waiting, o.response
        );
    }
    out
}

/// Human-readable metric summary.
pub fn summary(m: &SchedulingMetrics) -> String {
    format!(
        "Average Turnaround Time: {:.2}\n\
         Average Waiting Time: {:.2}\n\
         Average Response Time: {:.2}\n\
         CPU Utilization: {:.2}%\n\
         Throughput: {:.4} processes per unit time",
        m.avg_turnaround, m.avg_waiting, m.avg_response, m.cpu_utilization, m.throughput
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::algorithms::Algorithm;
    use crate::sim::process::{default_workload, Process};

    fn metrics(algorithm: Algorithm) -> SchedulingMetrics {
        SchedulingMetrics::from_schedule(&algorithm.run(&default_workload()).unwrap())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn fcfs_averages() {
        let m = metrics(Algorithm::Fcfs);
        assert_eq!(m.algorithm, "FCFS");
        assert!(close(m.avg_turnaround, 10.75));
        assert!(close(m.avg_waiting, 5.5));
        assert!(close(m.avg_response, 5.5));
        assert!(close(m.cpu_utilization, 100.0));
        assert!(close(m.throughput, 4.0 / 21.0));
    }

    #[test]
    fn round_robin_averages() {
        let m = metrics(Algorithm::RoundRobin { quantum: 2 });
        assert!(close(m.avg_turnaround, 12.5));
        assert!(close(m.avg_waiting, 7.25));
        assert!(close(m.avg_response, 1.5));
    }

    #[test]
    fn idle_time_lowers_utilization() {
        let s = Algorithm::Fcfs.run(&[Process::new(1, 3, 2, 1)]).unwrap();
        let m = SchedulingMetrics::from_schedule(&s);
        assert!(close(m.cpu_utilization, 2.0 / 5.0 * 100.0));
        assert!(close(m.throughput, 0.2));
    }

    #[test]
    fn csv_has_fixed_header_and_two_decimals() {
        let path = std::env::temp_dir().join(format!("sched-compare-results-{}.csv", std::process::id()));
        write_results_csv(&path, &[metrics(Algorithm::Fcfs), metrics(Algorithm::Sjf)]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Algorithm,Average Turnaround Time,Average Waiting Time,Average Response Time,\
             CPU Utilization (%),Throughput (processes/unit time)"
        );
        assert_eq!(lines[1], "FCFS,10.75,5.50,5.50,100.00,0.19");
        assert_eq!(lines[2], "SJF,9.25,4.00,4.00,100.00,0.19");
    }

    #[test]
    fn process_table_lists_every_process() {
        let s = Algorithm::Fcfs.run(&default_workload()).unwrap();
        let table = process_table(&s);
        assert_eq!(table.lines().count(), 5);
        assert!(table.lines().any(|l| l == "4\t6\t3\t21\t15\t12\t12"));
    }
}
