//! Single-step walk mechanics shared by every walk variant.
//!
//! Roll the flower's dice, look the sum up in the bias table, then try to
//! cross the chosen side of the current hex. The engine never decides when
//! a walk is over.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::core::dice::{Bias, DiceProfile, RollSource};
use crate::core::graph::HexGraph;
use crate::schema::hex::{Edge, HexId};

/// One recorded position of a walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub step_num: u32,
    pub hex_id: HexId,
    pub effect: Option<String>,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}: hex {}", self.step_num, self.hex_id)?;
        if let Some(effect) = &self.effect {
            write!(f, " ({})", effect)?;
        }
        Ok(())
    }
}

/// Why the walker stayed where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// The bias table mapped the roll to "no movement".
    NoMovement,
    /// The chosen side has no neighbor.
    ClosedEdge(Edge),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Moved { from: HexId, to: HexId, edge: Edge },
    Blocked(BlockReason),
}

/// Everything that happened during one call to `WalkEngine::step`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub roll: u32,
    pub movement: Movement,
    pub step: Step,
}

impl StepReport {
    pub fn is_blocked(&self) -> bool {
        matches!(self.movement, Movement::Blocked(_))
    }
}

/// Position and append-only history of a walker on a shared flower.
#[derive(Debug, Clone)]
pub struct WalkEngine {
    graph: Arc<HexGraph>,
    dice: DiceProfile,
    history: Vec<Step>,
}

impl WalkEngine {
    /// Place a walker on `start`, recording it as step 0.
    pub fn new(graph: Arc<HexGraph>, start: HexId) -> Self {
        let effect = graph.node(start).zone.effect().map(str::to_string);
        let dice = graph.dice();
        Self {
            graph,
            dice,
            history: vec![Step {
                step_num: 0,
                hex_id: start,
                effect,
            }],
        }
    }

    /// Rebuild an engine from a history that has already been checked to be
    /// non-empty and contiguous.
    pub(crate) fn resume(graph: Arc<HexGraph>, history: Vec<Step>) -> Self {
        let dice = graph.dice();
        Self {
            graph,
            dice,
            history,
        }
    }

    /// Take exactly one step and append it to the history.
    pub fn step<S: RollSource + ?Sized>(&mut self, source: &mut S) -> StepReport {
        let roll = self.dice.roll(source);
        let current = self.current().clone();

        // Sums outside the table cannot be rolled on a validated profile.
        let bias = self.dice.bias(roll).unwrap_or(Bias::NoMovement);
        let movement = match bias {
            Bias::NoMovement => Movement::Blocked(BlockReason::NoMovement),
            Bias::Edge(edge) => match self.graph.node(current.hex_id).adjacency.get(edge) {
                Some(to) => Movement::Moved {
                    from: current.hex_id,
                    to,
                    edge,
                },
                None => Movement::Blocked(BlockReason::ClosedEdge(edge)),
            },
        };

        let step_num = current.step_num + 1;
        let step = match movement {
            Movement::Moved { to, .. } => Step {
                step_num,
                hex_id: to,
                effect: self.graph.node(to).zone.effect().map(str::to_string),
            },
            Movement::Blocked(_) => Step {
                step_num,
                hex_id: current.hex_id,
                effect: current.effect,
            },
        };

        self.history.push(step.clone());
        StepReport {
            roll,
            movement,
            step,
        }
    }

    /// The most recent step. The history always holds the start record.
    pub fn current(&self) -> &Step {
        &self.history[self.history.len() - 1]
    }

    pub fn position(&self) -> HexId {
        self.current().hex_id
    }

    pub fn history(&self) -> &[Step] {
        &self.history
    }

    /// Steps taken after the start record.
    pub fn step_count(&self) -> u32 {
        self.current().step_num
    }

    pub fn graph(&self) -> &Arc<HexGraph> {
        &self.graph
    }

    pub fn dice(&self) -> DiceProfile {
        self.dice
    }
}
