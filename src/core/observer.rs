//! Hooks for whoever consumes a running walk: loggers, CSV writers, UIs.

use log::{debug, info, Level};

use crate::core::engine::{BlockReason, Movement, StepReport};
use crate::core::walk::Walk;

/// Called by `Walk::run_observed` after each step has been produced.
/// A walk that is already complete reports nothing.
///
/// All hooks default to doing nothing; `()` is the null observer.
pub trait WalkObserver {
    fn walk_started(&mut self, _walk: &Walk) {}
    fn step_taken(&mut self, _report: &StepReport) {}
    fn walk_finished(&mut self, _walk: &Walk) {}
}

impl WalkObserver for () {}

/// Forwards every hook to the `log` facade.
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    /// Level used for per-step records.
    pub step_level: Level,
}

impl Default for LogObserver {
    fn default() -> Self {
        Self {
            step_level: Level::Debug,
        }
    }
}

impl WalkObserver for LogObserver {
    fn walk_started(&mut self, walk: &Walk) {
        debug!("{}", walk);
    }

    fn step_taken(&mut self, report: &StepReport) {
        let step = &report.step;
        match report.movement {
            Movement::Moved { from, to, edge } => log::log!(
                self.step_level,
                "step {}: rolled {}, {} -> {} across side {}",
                step.step_num,
                report.roll,
                from,
                to,
                edge
            ),
            Movement::Blocked(BlockReason::NoMovement) => log::log!(
                self.step_level,
                "step {}: rolled {}, no movement, stays on {}",
                step.step_num,
                report.roll,
                step.hex_id
            ),
            Movement::Blocked(BlockReason::ClosedEdge(edge)) => log::log!(
                self.step_level,
                "step {}: rolled {}, side {} closed, stays on {}",
                step.step_num,
                report.roll,
                edge,
                step.hex_id
            ),
        }
    }

    fn walk_finished(&mut self, walk: &Walk) {
        let state = walk.current_state();
        info!(
            "{} walk finished after {} steps on hex {} ({})",
            walk.kind().name(),
            walk.len() - 1,
            state.hex_id,
            state.zone_type
        );
    }
}
