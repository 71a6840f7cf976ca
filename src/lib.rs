//! Compare CPU scheduling algorithms.
//!
//! [`sim`] runs FCFS, SJF, SRTF, Round Robin and Priority scheduling over a
//! workload and writes a results table; [`report::ReportRenderer`] turns such a
//! table into a five-panel bar chart saved as PNG, which [`app`] can also show
//! interactively.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod figure;
pub mod render;
pub mod report;
pub mod sim;
pub mod state;
pub mod ui;

pub use error::{ReportError, SimError};
pub use figure::Figure;
pub use render::RenderOptions;
pub use report::{confirmation_line, Report, ReportRenderer};
