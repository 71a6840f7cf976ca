use std::path::{Path, PathBuf};

use crate::figure::Figure;
use crate::render::save_png;
use crate::report::{confirmation_line, ReportRenderer};

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// Status line shown in the top bar.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// The full viewer state, independent of rendering.
pub struct ViewerState {
    /// Figure currently on screen.
    pub figure: Figure,

    /// Table the figure was built from; re-read on reload.
    pub input: PathBuf,

    /// Where the figure was last saved.
    pub output: PathBuf,

    pub renderer: ReportRenderer,

    /// Draw value labels above bars.
    pub show_values: bool,

    pub status: Option<Status>,
}

impl ViewerState {
    pub fn new(figure: Figure, input: PathBuf, output: PathBuf, renderer: ReportRenderer) -> Self {
        Self {
            figure,
            input,
            output,
            renderer,
            show_values: true,
            status: None,
        }
    }

    /// Rebuild the figure from the input table. On failure the current
    /// figure stays on screen.
    pub fn reload(&mut self) {
        match self.renderer.prepare(&self.input) {
            Ok(figure) => {
                log::info!("Reloaded {}", self.input.display());
                self.figure = figure;
                self.status = Some(Status::Info(format!("Reloaded {}", self.input.display())));
            }
            Err(e) => {
                log::error!("Failed to reload: {e}");
                self.status = Some(Status::Error(format!("Error: {e}")));
            }
        }
    }

    /// Save the current figure to `path`.
    pub fn export(&mut self, path: &Path) {
        match save_png(&self.figure, path, self.renderer.options()) {
            Ok(()) => {
                self.output = path.to_path_buf();
                self.status = Some(Status::Info(confirmation_line(path)));
            }
            Err(e) => {
                log::error!("Failed to export: {e}");
                self.status = Some(Status::Error(format!("Error: {e}")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BarColoring;
    use crate::data::metrics::{Metric, ALGORITHM_COLUMN};
    use crate::data::model::{CellValue, ResultsTable};

    fn state(input: PathBuf) -> ViewerState {
        let columns: Vec<String> = std::iter::once(ALGORITHM_COLUMN)
            .chain(Metric::ALL.iter().map(|m| m.column_name()))
            .map(String::from)
            .collect();
        let row: Vec<CellValue> = std::iter::once(CellValue::String("FCFS".into()))
            .chain((0..5).map(|_| CellValue::Float(1.0)))
            .collect();
        let table = ResultsTable::new(columns, vec![row]);
        let figure = Figure::build(&table, BarColoring::Uniform).unwrap();
        ViewerState::new(figure, input, PathBuf::from("out.png"), ReportRenderer::default())
    }

    #[test]
    fn failed_reload_keeps_current_figure() {
        let missing = std::env::temp_dir().join("sched-compare-state-missing.csv");
        let mut s = state(missing);
        let before = s.figure.clone();

        s.reload();

        assert_eq!(s.figure, before);
        assert!(matches!(s.status, Some(Status::Error(_))));
    }

    #[test]
    fn reload_picks_up_new_rows() {
        let path = std::env::temp_dir().join(format!("sched-compare-state-{}.csv", std::process::id()));
        let header = std::iter::once(ALGORITHM_COLUMN)
            .chain(Metric::ALL.iter().map(|m| m.column_name()))
            .collect::<Vec<_>>()
            .join(",");
        std::fs::write(&path, format!("{header}\nFCFS,1,2,3,4,5\nRR,6,7,8,9,10\n")).unwrap();

        let mut s = state(path.clone());
        s.reload();
        std::fs::remove_file(&path).ok();

        assert_eq!(s.figure.categories, ["FCFS", "RR"]);
        assert!(matches!(s.status, Some(Status::Info(_))));
    }
}
