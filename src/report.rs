//! The comparison report: load a results table, build the five-panel figure,
//! and save it as a PNG.

use std::path::{Path, PathBuf};

use crate::data::loader::load_file;
use crate::data::metrics::{Metric, CPU_UTILIZATION_ALIAS};
use crate::data::model::ResultsTable;
use crate::error::ReportError;
use crate::figure::Figure;
use crate::render::{save_png, RenderOptions};

/// Default input table.
pub const DEFAULT_INPUT: &str = "results.csv";
/// Default output image.
pub const DEFAULT_OUTPUT: &str = "scheduling_comparison.png";

/// Outcome of a successful render.
#[derive(Debug, Clone)]
pub struct Report {
    pub output: PathBuf,
    pub figure: Figure,
}

/// Single-shot renderer from a results table to a comparison chart.
#[derive(Debug, Clone, Default)]
pub struct ReportRenderer {
    options: RenderOptions,
}

impl ReportRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Load `input` and build the figure without drawing anything.
    pub fn prepare(&self, input: &Path) -> Result<Figure, ReportError> {
        let mut table = load_file(input)?;
        normalize_columns(&mut table);
        Figure::build(&table, self.options.coloring)
    }

    /// Load, build, and save. `output` is only touched once the image is
    /// fully encoded; an existing file is replaced.
    pub fn render(&self, input: &Path, output: &Path) -> Result<Report, ReportError> {
        let figure = self.prepare(input)?;
        save_png(&figure, output, &self.options)?;
        Ok(Report {
            output: output.to_path_buf(),
            figure,
        })
    }
}

/// Add the legacy `CPU Utilization` alias when the percentage column exists.
pub fn normalize_columns(table: &mut ResultsTable) {
    let source = Metric::CpuUtilization.column_name();
    if table.alias_column(source, CPU_UTILIZATION_ALIAS) {
        log::debug!("Aliased '{source}' as '{CPU_UTILIZATION_ALIAS}'");
    }
}

/// Line printed after a successful save.
pub fn confirmation_line(output: &Path) -> String {
    format!("Plot has been saved as '{}'", output.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    #[test]
    fn confirmation_names_the_file() {
        assert_eq!(
            confirmation_line(Path::new(DEFAULT_OUTPUT)),
            "Plot has been saved as 'scheduling_comparison.png'"
        );
    }

    #[test]
    fn normalize_adds_alias_only_when_source_present() {
        let mut with = ResultsTable::new(
            vec!["Algorithm".into(), "CPU Utilization (%)".into()],
            vec![vec![CellValue::String("RR".into()), CellValue::Float(100.0)]],
        );
        normalize_columns(&mut with);
        assert_eq!(
            with.column("CPU Utilization").unwrap(),
            vec![&CellValue::Float(100.0)]
        );

        let mut without = ResultsTable::new(vec!["Algorithm".into()], Vec::new());
        normalize_columns(&mut without);
        assert!(!without.has_column("CPU Utilization"));
    }
}
