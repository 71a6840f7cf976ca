//! Command line configuration for both binaries.
//!
//! Every flag defaults to the fixed behaviour: read `results.csv`, write
//! `scheduling_comparison.png` at 300 dpi, then show the figure.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{App, Arg, ArgMatches};

use crate::color::BarColoring;
use crate::render::RenderOptions;
use crate::report::{DEFAULT_INPUT, DEFAULT_OUTPUT};
use crate::sim::algorithms::Algorithm;

/// Default simulator output; the chart's default input.
pub const DEFAULT_RESULTS: &str = DEFAULT_INPUT;

// ---------------------------------------------------------------------------
// sched-compare
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub render: RenderOptions,
    /// Open the interactive viewer after saving.
    pub show: bool,
}

impl ChartConfig {
    pub fn app() -> App<'static, 'static> {
        App::new("sched-compare")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Render comparison bar charts of scheduling algorithm metrics")
            .arg(
                Arg::with_name("input")
                    .long("input")
                    .short("i")
                    .value_name("FILE")
                    .help("results table (.csv, .json or .parquet)")
                    .takes_value(true)
                    .default_value(DEFAULT_INPUT),
            )
            .arg(
                Arg::with_name("output")
                    .long("output")
                    .short("o")
                    .value_name("FILE")
                    .help("PNG file to write")
                    .takes_value(true)
                    .default_value(DEFAULT_OUTPUT),
            )
            .arg(
                Arg::with_name("dpi")
                    .long("dpi")
                    .value_name("INT")
                    .help("output resolution in pixels per inch")
                    .takes_value(true)
                    .default_value("300"),
            )
            .arg(
                Arg::with_name("color-by-algorithm")
                    .long("color-by-algorithm")
                    .help("give each algorithm its own bar colour")
                    .takes_value(false),
            )
            .arg(
                Arg::with_name("no-show")
                    .long("no-show")
                    .help("do not open the interactive viewer")
                    .takes_value(false),
            )
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let dpi: u32 = matches
            .value_of("dpi")
            .unwrap_or("300")
            .parse()
            .context("invalid value for 'dpi'")?;
        if dpi == 0 {
            bail!("invalid value for 'dpi': must be positive");
        }

        let coloring = if matches.is_present("color-by-algorithm") {
            BarColoring::ByAlgorithm
        } else {
            BarColoring::Uniform
        };

        Ok(Self {
            input: PathBuf::from(matches.value_of("input").unwrap_or(DEFAULT_INPUT)),
            output: PathBuf::from(matches.value_of("output").unwrap_or(DEFAULT_OUTPUT)),
            render: RenderOptions {
                dpi,
                coloring,
                ..RenderOptions::default()
            },
            show: !matches.is_present("no-show"),
        })
    }

    pub fn parse_from_env() -> Result<Self> {
        Self::from_matches(&Self::app().get_matches())
    }
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SimulateConfig {
    /// Workload CSV; the built-in workload when absent.
    pub workload: Option<PathBuf>,
    pub quantum: u32,
    pub output: PathBuf,
}

impl SimulateConfig {
    pub fn app() -> App<'static, 'static> {
        App::new("simulate")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Run CPU scheduling algorithms and write their metrics")
            .arg(
                Arg::with_name("workload")
                    .long("workload")
                    .short("w")
                    .value_name("FILE")
                    .help("CSV with columns id,arrival,burst,priority")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("quantum")
                    .long("quantum")
                    .short("q")
                    .value_name("INT")
                    .help("round robin time quantum")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("output")
                    .long("output")
                    .short("o")
                    .value_name("FILE")
                    .help("results table to write")
                    .takes_value(true)
                    .default_value(DEFAULT_RESULTS),
            )
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let quantum = match matches.value_of("quantum") {
            Some(v) => v.parse().context("invalid value for 'quantum'")?,
            None => Algorithm::DEFAULT_QUANTUM,
        };
        if quantum == 0 {
            bail!("invalid value for 'quantum': must be positive");
        }

        Ok(Self {
            workload: matches.value_of("workload").map(PathBuf::from),
            quantum,
            output: PathBuf::from(matches.value_of("output").unwrap_or(DEFAULT_RESULTS)),
        })
    }

    pub fn parse_from_env() -> Result<Self> {
        Self::from_matches(&Self::app().get_matches())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(args: &[&str]) -> Result<ChartConfig> {
        let argv = std::iter::once("sched-compare").chain(args.iter().copied());
        ChartConfig::from_matches(&ChartConfig::app().get_matches_from(argv))
    }

    fn simulate(args: &[&str]) -> Result<SimulateConfig> {
        let argv = std::iter::once("simulate").chain(args.iter().copied());
        SimulateConfig::from_matches(&SimulateConfig::app().get_matches_from(argv))
    }

    #[test]
    fn chart_defaults_match_fixed_behaviour() {
        let config = chart(&[]).unwrap();
        assert_eq!(config.input, PathBuf::from("results.csv"));
        assert_eq!(config.output, PathBuf::from("scheduling_comparison.png"));
        assert_eq!(config.render, RenderOptions::default());
        assert!(config.show);
    }

    #[test]
    fn chart_flags_override_defaults() {
        let config = chart(&[
            "--input",
            "runs.parquet",
            "--dpi",
            "100",
            "--color-by-algorithm",
            "--no-show",
        ])
        .unwrap();
        assert_eq!(config.input, PathBuf::from("runs.parquet"));
        assert_eq!(config.render.dpi, 100);
        assert_eq!(config.render.coloring, BarColoring::ByAlgorithm);
        assert!(!config.show);
    }

    #[test]
    fn chart_rejects_bad_dpi() {
        assert!(chart(&["--dpi", "high"]).is_err());
        assert!(chart(&["--dpi", "0"]).is_err());
    }

    #[test]
    fn simulate_defaults() {
        let config = simulate(&[]).unwrap();
        assert_eq!(config.workload, None);
        assert_eq!(config.quantum, 2);
        assert_eq!(config.output, PathBuf::from("results.csv"));
    }

    #[test]
    fn simulate_rejects_zero_quantum() {
        assert!(simulate(&["-q", "0"]).is_err());
        assert_eq!(simulate(&["-q", "4"]).unwrap().quantum, 4);
    }
}
