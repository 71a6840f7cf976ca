use anyhow::{Context, Result};

use sched_compare::app;
use sched_compare::config::ChartConfig;
use sched_compare::state::ViewerState;
use sched_compare::{confirmation_line, ReportRenderer};

fn main() -> Result<()> {
    env_logger::init();

    let config = ChartConfig::parse_from_env()?;
    let renderer = ReportRenderer::new(config.render.clone());

    let report = renderer
        .render(&config.input, &config.output)
        .with_context(|| format!("rendering {}", config.input.display()))?;
    println!("{}", confirmation_line(&report.output));

    if config.show {
        let state = ViewerState::new(report.figure, config.input, report.output, renderer);
        if let Err(e) = app::show(state) {
            log::warn!("Interactive display unavailable: {e}");
        }
    }

    Ok(())
}
