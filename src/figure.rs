//! Backend-neutral description of the comparison figure.
//!
//! A [`Figure`] is everything both the PNG renderer and the interactive viewer
//! need: grid geometry, one [`Panel`] per metric, and one [`Bar`] per algorithm
//! with its formatted value label.

use std::ops::Range;

use crate::color::{bar_colors, BarColoring, Rgb};
use crate::data::metrics::{Metric, ALGORITHM_COLUMN};
use crate::data::model::{CellValue, ResultsTable};
use crate::error::ReportError;

pub const GRID_ROWS: usize = 3;
pub const GRID_COLS: usize = 2;

/// Logical canvas size in inches.
pub const FIGURE_SIZE_INCHES: (f64, f64) = (14.0, 10.0);

/// Counter-clockwise rotation of category tick labels, in degrees.
pub const TICK_ROTATION_DEGREES: f64 = 15.0;

/// Fraction of the value span kept free above the tallest bar for its label.
const LABEL_HEADROOM: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub category: String,
    pub height: f64,
    /// Height formatted to exactly two decimals.
    pub label: String,
    pub color: Rgb,
}

impl Bar {
    /// Missing or infinite values keep their slot and label but draw nothing.
    pub fn is_drawn(&self) -> bool {
        self.height.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub metric: Metric,
    pub title: String,
    pub row: usize,
    pub col: usize,
    pub bars: Vec<Bar>,
}

impl Panel {
    /// Y-axis range covering zero and every bar, with headroom for labels.
    pub fn value_range(&self) -> Range<f64> {
        let lo = self.bars.iter().map(|b| b.height).fold(0.0, f64::min);
        let hi = self.bars.iter().map(|b| b.height).fold(0.0, f64::max);
        let span = hi - lo;
        if span <= f64::EPSILON || !span.is_finite() {
            return 0.0..1.0;
        }
        let pad = span * LABEL_HEADROOM;
        let lo = if lo < 0.0 { lo - pad } else { lo };
        lo..(hi + pad)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub rows: usize,
    pub cols: usize,
    pub size_inches: (f64, f64),
    pub tick_rotation: f64,
    /// Category axis shared by every panel, in table row order.
    pub categories: Vec<String>,
    pub panels: Vec<Panel>,
}

/// Bar label text.
pub fn format_value(height: f64) -> String {
    if height.is_nan() {
        return "nan".to_string();
    }
    format!("{height:.2}")
}

impl Figure {
    /// Build the five metric panels from a loaded table.
    ///
    /// Fails on the first missing column (algorithm column first, then metrics
    /// in display order) or the first cell that is not numeric. Empty cells
    /// become NaN bars.
    pub fn build(table: &ResultsTable, coloring: BarColoring) -> Result<Self, ReportError> {
        let categories: Vec<String> = table
            .require_column(ALGORITHM_COLUMN)?
            .into_iter()
            .map(CellValue::to_string)
            .collect();
        let colors = bar_colors(categories.len(), coloring);

        let mut panels = Vec::with_capacity(Metric::ALL.len());
        for (i, metric) in Metric::ALL.into_iter().enumerate() {
            let column = metric.column_name();
            let values = table.require_column(column)?;

            let mut bars = Vec::with_capacity(values.len());
            for (row, ((value, category), color)) in
                values.iter().zip(&categories).zip(&colors).enumerate()
            {
                let height = match value {
                    CellValue::Null => f64::NAN,
                    _ => value.as_f64().ok_or_else(|| ReportError::NotNumeric {
                        column: column.to_string(),
                        row,
                        value: value.to_string(),
                    })?,
                };
                bars.push(Bar {
                    category: category.clone(),
                    height,
                    label: format_value(height),
                    color: *color,
                });
            }

            log::debug!("Panel {i} '{column}': {} bars", bars.len());
            panels.push(Panel {
                metric,
                title: column.to_string(),
                row: i / GRID_COLS,
                col: i % GRID_COLS,
                bars,
            });
        }

        Ok(Figure {
            rows: GRID_ROWS,
            cols: GRID_COLS,
            size_inches: FIGURE_SIZE_INCHES,
            tick_rotation: TICK_ROTATION_DEGREES,
            categories,
            panels,
        })
    }

    /// Panel occupying grid cell `(row, col)`, if any.
    pub fn panel_at(&self, row: usize, col: usize) -> Option<&Panel> {
        self.panels.iter().find(|p| p.row == row && p.col == col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ResultsTable {
        let columns: Vec<String> = std::iter::once(ALGORITHM_COLUMN)
            .chain(Metric::ALL.iter().map(|m| m.column_name()))
            .map(String::from)
            .collect();
        let row = |name: &str, base: f64| -> Vec<CellValue> {
            std::iter::once(CellValue::String(name.into()))
                .chain((0..5).map(|i| CellValue::Float(base + i as f64)))
                .collect()
        };
        ResultsTable::new(columns, vec![row("FCFS", 1.5), row("SJF", 2.75)])
    }

    #[test]
    fn throughput_panel_matches_source() {
        let fig = Figure::build(&sample_table(), BarColoring::Uniform).unwrap();
        let panel = &fig.panels[0];
        assert_eq!(panel.title, "Throughput (processes/unit time)");
        let cats: Vec<_> = panel.bars.iter().map(|b| b.category.as_str()).collect();
        let labels: Vec<_> = panel.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(cats, ["FCFS", "SJF"]);
        assert_eq!(labels, ["1.50", "2.75"]);
        assert_eq!(panel.bars[1].height, 2.75);
    }

    #[test]
    fn panels_fill_row_major_leaving_last_cell_empty() {
        let fig = Figure::build(&sample_table(), BarColoring::Uniform).unwrap();
        let cells: Vec<_> = fig.panels.iter().map(|p| (p.row, p.col)).collect();
        assert_eq!(cells, [(0, 0), (0, 1), (1, 0), (1, 1), (2, 0)]);
        assert!(fig.panel_at(2, 1).is_none());
        assert_eq!(fig.panel_at(1, 1).unwrap().metric, Metric::AverageResponse);
    }

    #[test]
    fn labels_round_to_two_decimals() {
        for (value, text) in [(1.0, "1.00"), (0.190476, "0.19"), (12.346, "12.35"), (-3.0, "-3.00")] {
            let label = format_value(value);
            assert_eq!(label, text);
            let parsed: f64 = label.parse().unwrap();
            assert!((parsed - value).abs() <= 0.005 + 1e-9);
        }
    }

    #[test]
    fn missing_metric_column_aborts() {
        let table = sample_table();
        let keep: Vec<String> = table
            .columns()
            .iter()
            .filter(|c| c.as_str() != "Average Response Time")
            .cloned()
            .collect();
        let rows: Vec<Vec<CellValue>> = (0..table.len())
            .map(|r| {
                keep.iter()
                    .map(|c| table.column(c).unwrap()[r].clone())
                    .collect()
            })
            .collect();
        let err = Figure::build(&ResultsTable::new(keep, rows), BarColoring::Uniform).unwrap_err();
        assert!(
            matches!(err, ReportError::MissingColumn { ref column, .. } if column == "Average Response Time"),
            "{err}"
        );
    }

    #[test]
    fn non_numeric_cell_is_reported_with_position() {
        let table = ResultsTable::new(
            std::iter::once(ALGORITHM_COLUMN)
                .chain(Metric::ALL.iter().map(|m| m.column_name()))
                .map(String::from)
                .collect(),
            vec![vec![
                CellValue::String("FCFS".into()),
                CellValue::String("fast".into()),
            ]],
        );
        let err = Figure::build(&table, BarColoring::Uniform).unwrap_err();
        match err {
            ReportError::NotNumeric { column, row, value } => {
                assert_eq!(column, "Throughput (processes/unit time)");
                assert_eq!(row, 0);
                assert_eq!(value, "fast");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_cell_becomes_blank_bar() {
        let columns: Vec<String> = std::iter::once(ALGORITHM_COLUMN)
            .chain(Metric::ALL.iter().map(|m| m.column_name()))
            .map(String::from)
            .collect();
        let mut first: Vec<CellValue> = std::iter::once(CellValue::String("A".into()))
            .chain((0..5).map(|i| CellValue::Float(i as f64)))
            .collect();
        first[1] = CellValue::Null;
        let second: Vec<CellValue> = std::iter::once(CellValue::String("B".into()))
            .chain((0..5).map(|_| CellValue::Float(2.75)))
            .collect();
        let table = ResultsTable::new(columns, vec![first, second]);

        let fig = Figure::build(&table, BarColoring::Uniform).unwrap();
        let bar = &fig.panels[0].bars[0];
        assert!(bar.height.is_nan());
        assert_eq!(bar.label, "nan");
        assert!(!bar.is_drawn());
        assert!(fig.panels[0].bars[1].is_drawn());
        assert_eq!(fig.panels[0].value_range().start, 0.0);
        assert!(fig.panels[0].value_range().end > 2.75);
    }

    #[test]
    fn value_range_leaves_room_for_labels() {
        let fig = Figure::build(&sample_table(), BarColoring::Uniform).unwrap();
        let range = fig.panels[0].value_range();
        assert_eq!(range.start, 0.0);
        assert!(range.end > 2.75);

        let flat = Panel {
            metric: Metric::Throughput,
            title: String::new(),
            row: 0,
            col: 0,
            bars: Vec::new(),
        };
        assert_eq!(flat.value_range(), 0.0..1.0);
    }

    #[test]
    fn by_algorithm_coloring_is_consistent_across_panels() {
        let fig = Figure::build(&sample_table(), BarColoring::ByAlgorithm).unwrap();
        let first: Vec<_> = fig.panels[0].bars.iter().map(|b| b.color).collect();
        for panel in &fig.panels[1..] {
            let colors: Vec<_> = panel.bars.iter().map(|b| b.color).collect();
            assert_eq!(colors, first);
        }
        assert_ne!(first[0], first[1]);
    }
}
