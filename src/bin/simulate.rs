use anyhow::{Context, Result};

use sched_compare::config::SimulateConfig;
use sched_compare::sim::{self, metrics, process};

fn main() -> Result<()> {
    env_logger::init();

    let config = SimulateConfig::parse_from_env()?;

    let workload = match &config.workload {
        Some(path) => process::load_workload(path)?,
        None => process::default_workload(),
    };
    log::info!("Simulating {} processes (quantum = {})", workload.len(), config.quantum);

    let results = sim::compare(&workload, config.quantum)?;

    for (schedule, m) in &results {
        println!("\n=== {} ===", schedule.algorithm);
        print!("{}", metrics::process_table(schedule));
        println!("{}", metrics::summary(m));
    }

    let rows: Vec<_> = results.into_iter().map(|(_, m)| m).collect();
    metrics::write_results_csv(&config.output, &rows)
        .with_context(|| format!("writing {}", config.output.display()))?;

    println!("\nMetrics have been saved to {}", config.output.display());
    Ok(())
}
