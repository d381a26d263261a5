// File: crates/trellis-core/src/dispatch.rs
// Summary: Group-wide render/redraw dispatch with per-chart failure isolation.

use tracing::error;

use crate::error::{BatchError, ChartError};
use crate::registry::ChartRegistry;

enum Pass {
    Redraw,
    Render,
}

/// Incrementally redraw every chart registered in `group`, in registration
/// order. One chart's failure is logged and recorded, and the walk
/// continues; failures surface as a single [`BatchError`] after every chart
/// has been attempted. An unknown group is a no-op success.
pub fn redraw_group(registry: &ChartRegistry, group: &str) -> Result<(), BatchError> {
    dispatch(registry, group, Pass::Redraw)
}

/// Fully (re)build every chart registered in `group` — used after structural
/// changes rather than filter changes. Same isolation policy as
/// [`redraw_group`].
pub fn render_group(registry: &ChartRegistry, group: &str) -> Result<(), BatchError> {
    dispatch(registry, group, Pass::Render)
}

/// Redraw every group the registry knows about.
pub fn redraw_all(registry: &ChartRegistry) -> Result<(), BatchError> {
    dispatch_all(registry, Pass::Redraw)
}

/// Render every group the registry knows about.
pub fn render_all(registry: &ChartRegistry) -> Result<(), BatchError> {
    dispatch_all(registry, Pass::Render)
}

fn dispatch(registry: &ChartRegistry, group: &str, pass: Pass) -> Result<(), BatchError> {
    let mut failures: Vec<(crate::chart::ChartId, ChartError)> = Vec::new();
    run_pass(registry, group, &pass, &mut failures);
    if failures.is_empty() {
        Ok(())
    } else {
        Err(BatchError { failures })
    }
}

fn dispatch_all(registry: &ChartRegistry, pass: Pass) -> Result<(), BatchError> {
    let mut failures: Vec<(crate::chart::ChartId, ChartError)> = Vec::new();
    for group in registry.all_groups() {
        run_pass(registry, &group, &pass, &mut failures);
    }
    if failures.is_empty() {
        Ok(())
    } else {
        Err(BatchError { failures })
    }
}

fn run_pass(
    registry: &ChartRegistry,
    group: &str,
    pass: &Pass,
    failures: &mut Vec<(crate::chart::ChartId, ChartError)>,
) {
    // Members are snapshotted up front; each chart's pass is self-contained
    // and never observes a sibling mid-update.
    for (id, chart) in registry.charts_in(group) {
        let result = {
            let mut chart = chart.borrow_mut();
            match pass {
                Pass::Redraw => chart.redraw(),
                Pass::Render => chart.render(),
            }
        };
        if let Err(err) = result {
            error!(chart = %id, group, %err, "chart failed during group dispatch");
            failures.push((id, err));
        }
    }
}
