use std::fmt;

/// Category column shared by every panel.
pub const ALGORITHM_COLUMN: &str = "Algorithm";

/// Legacy alias created from [`Metric::CpuUtilization`]'s column on load.
pub const CPU_UTILIZATION_ALIAS: &str = "CPU Utilization";

/// One of the five compared performance measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Throughput,
    CpuUtilization,
    AverageTurnaround,
    AverageResponse,
    AverageWaiting,
}

impl Metric {
    /// Fixed display order; index `i` lands in grid cell `(i / 2, i % 2)`.
    pub const ALL: [Metric; 5] = [
        Metric::Throughput,
        Metric::CpuUtilization,
        Metric::AverageTurnaround,
        Metric::AverageResponse,
        Metric::AverageWaiting,
    ];

    /// Literal column header in the results table.
    pub fn column_name(self) -> &'static str {
        match self {
            Metric::Throughput => "Throughput (processes/unit time)",
            Metric::CpuUtilization => "CPU Utilization (%)",
            Metric::AverageTurnaround => "Average Turnaround Time",
            Metric::AverageResponse => "Average Response Time",
            Metric::AverageWaiting => "Average Waiting Time",
        }
    }

    pub fn position(self) -> usize {
        Metric::ALL
            .iter()
            .position(|m| *m == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}
