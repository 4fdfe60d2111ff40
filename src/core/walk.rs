//! Walk variants: fixed-length walks and zone-terminated walks.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::core::dice::RollSource;
use crate::core::engine::{Step, StepReport, WalkEngine};
use crate::core::graph::{FlowerCategory, HexGraph};
use crate::core::observer::WalkObserver;
use crate::schema::hex::{HexId, HEX_COUNT};

/// Zone types that end a self-terminating walk.
pub const TERMINUS_TYPES: [&str; 6] = [
    "end",
    "stop",
    "terminus",
    "eruption",
    "pitch forks",
    "special",
];

/// Zone type marking candidate start hexes of a self-terminating walk.
pub const DEFAULT_START_ZONE: &str = "start";

/// Shortest allowed fixed-length walk.
pub const MIN_LENGTH: u32 = 10;
/// Longest allowed fixed-length walk.
pub const MAX_LENGTH: u32 = 75;

pub fn is_terminus(zone_type: &str) -> bool {
    TERMINUS_TYPES.contains(&zone_type)
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("walk length {0} is outside 10..=75")]
    LengthOutOfRange(u32),
    #[error("start hex {0} is outside 1..=19")]
    StartOutOfRange(i64),
    #[error("{walk} walk cannot run on a {category} flower")]
    IncompatibleCategory {
        walk: &'static str,
        category: FlowerCategory,
    },
    #[error("no hex has start zone type '{0}'")]
    MissingStartZone(String),
    #[error("flower has {0} terminus hexes, expected 1..=18")]
    TerminusCount(usize),
    #[error("invalid walk history: {0}")]
    InvalidHistory(String),
}

/// The closed set of walk variants and their termination rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalkKind {
    /// Ends after a fixed number of steps.
    Basic { length: u32 },
    /// Starts on a random `start_zone` hex, ends on a terminus hex.
    SelfTerminating { start_zone: String },
}

impl WalkKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic { .. } => "basic",
            Self::SelfTerminating { .. } => "self-terminating",
        }
    }

    pub fn accepts(&self, category: FlowerCategory) -> bool {
        match self {
            Self::Basic { .. } => matches!(
                category,
                FlowerCategory::Normal
                    | FlowerCategory::Basic
                    | FlowerCategory::Terrain
                    | FlowerCategory::Weather
            ),
            Self::SelfTerminating { .. } => category == FlowerCategory::Terminating,
        }
    }

    fn is_complete(&self, engine: &WalkEngine) -> bool {
        match self {
            Self::Basic { length } => engine.step_count() >= *length,
            Self::SelfTerminating { .. } => {
                let node = engine.graph().node(engine.position());
                is_terminus(node.zone.zone_type())
            }
        }
    }

    fn check_category(&self, graph: &HexGraph) -> Result<(), ConfigurationError> {
        if self.accepts(graph.category()) {
            Ok(())
        } else {
            Err(ConfigurationError::IncompatibleCategory {
                walk: self.name(),
                category: graph.category(),
            })
        }
    }
}

/// Where the walker is now, and what that hex means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentState<'a> {
    pub hex_id: HexId,
    pub zone_type: &'a str,
    pub effect: Option<&'a str>,
}

/// A walk on a shared hex flower.
///
/// Randomness is passed in on every call that needs it; the walk itself
/// holds no generator, so it can be serialized between steps and resumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "WalkRecord", into = "WalkRecord")]
pub struct Walk {
    engine: WalkEngine,
    kind: WalkKind,
}

impl Walk {
    /// A fixed-length walk of `length` steps starting on `start` (default 1).
    pub fn basic(
        graph: Arc<HexGraph>,
        length: u32,
        start: Option<i64>,
    ) -> Result<Walk, ConfigurationError> {
        let kind = WalkKind::Basic { length };
        kind.check_category(&graph)?;
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            return Err(ConfigurationError::LengthOutOfRange(length));
        }
        let start = match start {
            Some(value) => HexId::new(value).ok_or(ConfigurationError::StartOutOfRange(value))?,
            None => HexId::FIRST,
        };

        debug!("basic walk created: length={}, start={}", length, start);
        Ok(Walk {
            engine: WalkEngine::new(graph, start),
            kind,
        })
    }

    /// A walk that starts on a random hex of type `start_zone` (default
    /// `"start"`) and ends when it reaches a terminus hex.
    pub fn self_terminating<S: RollSource + ?Sized>(
        graph: Arc<HexGraph>,
        start_zone: Option<&str>,
        source: &mut S,
    ) -> Result<Walk, ConfigurationError> {
        let start_zone = start_zone.unwrap_or(DEFAULT_START_ZONE).to_string();
        let kind = WalkKind::SelfTerminating {
            start_zone: start_zone.clone(),
        };
        kind.check_category(&graph)?;
        let candidates = check_terminating_layout(&graph, &start_zone)?;

        let start = candidates[source.choose(candidates.len())];
        debug!(
            "self-terminating walk created: start={} chosen from {} '{}' hexes",
            start,
            candidates.len(),
            start_zone
        );
        Ok(Walk {
            engine: WalkEngine::new(graph, start),
            kind,
        })
    }

    pub fn kind(&self) -> &WalkKind {
        &self.kind
    }

    pub fn is_complete(&self) -> bool {
        self.kind.is_complete(&self.engine)
    }

    /// Take one step, or do nothing and return `None` once the walk is over.
    pub fn step<S: RollSource + ?Sized>(&mut self, source: &mut S) -> Option<StepReport> {
        if self.is_complete() {
            return None;
        }
        Some(self.engine.step(source))
    }

    /// Step until the walk is complete and return the full history.
    ///
    /// A self-terminating walk only stops on a terminus hex; on a flower
    /// where none is reachable from the start this does not return.
    pub fn run<S: RollSource + ?Sized>(&mut self, source: &mut S) -> &[Step] {
        self.run_observed(source, &mut ())
    }

    /// Like `run`, reporting each step to `observer` after it is taken.
    ///
    /// A walk that is already complete fires no hooks at all.
    pub fn run_observed<S, O>(&mut self, source: &mut S, observer: &mut O) -> &[Step]
    where
        S: RollSource + ?Sized,
        O: WalkObserver + ?Sized,
    {
        if self.is_complete() {
            return self.engine.history();
        }
        observer.walk_started(self);
        while let Some(report) = self.step(source) {
            observer.step_taken(&report);
        }
        observer.walk_finished(self);
        self.engine.history()
    }

    pub fn history(&self) -> &[Step] {
        self.engine.history()
    }

    /// Number of recorded steps, including the start.
    pub fn len(&self) -> usize {
        self.engine.history().len()
    }

    /// Always false: a walk holds at least its start record.
    pub fn is_empty(&self) -> bool {
        self.engine.history().is_empty()
    }

    pub fn current_state(&self) -> CurrentState<'_> {
        let hex_id = self.engine.position();
        let zone = &self.engine.graph().node(hex_id).zone;
        CurrentState {
            hex_id,
            zone_type: zone.zone_type(),
            effect: zone.effect(),
        }
    }

    pub fn graph(&self) -> &Arc<HexGraph> {
        self.engine.graph()
    }

    pub fn engine(&self) -> &WalkEngine {
        &self.engine
    }
}

impl fmt::Display for Walk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WalkKind::Basic { length } => write!(f, "basic walk of length {}", length)?,
            WalkKind::SelfTerminating { start_zone } => {
                write!(f, "self-terminating walk from '{}'", start_zone)?
            }
        }
        write!(
            f,
            " on a {} flower with {} dice, {} steps taken, now on hex {}",
            self.graph().category(),
            self.engine.dice(),
            self.engine.step_count(),
            self.engine.position()
        )
    }
}

/// Start candidates of a terminating flower, after checking it has a sane
/// number of terminus hexes.
fn check_terminating_layout(
    graph: &HexGraph,
    start_zone: &str,
) -> Result<Vec<HexId>, ConfigurationError> {
    let candidates = graph.hexes_of_type(start_zone);
    if candidates.is_empty() {
        return Err(ConfigurationError::MissingStartZone(start_zone.to_string()));
    }
    let termini = graph
        .nodes()
        .iter()
        .filter(|n| is_terminus(n.zone.zone_type()))
        .count();
    if !(1..HEX_COUNT).contains(&termini) {
        return Err(ConfigurationError::TerminusCount(termini));
    }
    Ok(candidates)
}

/// Every step carries its hex's effect and either stays put or crosses an
/// open side of the previous hex.
fn check_steps_follow_graph(
    graph: &HexGraph,
    history: &[Step],
) -> Result<(), ConfigurationError> {
    for step in history {
        let effect = graph.node(step.hex_id).zone.effect();
        if step.effect.as_deref() != effect {
            return Err(ConfigurationError::InvalidHistory(format!(
                "step {} carries effect {:?}, hex {} has {:?}",
                step.step_num, step.effect, step.hex_id, effect
            )));
        }
    }
    for pair in history.windows(2) {
        let (from, to) = (pair[0].hex_id, pair[1].hex_id);
        let reachable = graph
            .node(from)
            .adjacency
            .iter()
            .any(|(_, target)| target == Some(to));
        if from != to && !reachable {
            return Err(ConfigurationError::InvalidHistory(format!(
                "step {} jumps from hex {} to hex {}, which is not a neighbor",
                pair[1].step_num, from, to
            )));
        }
    }
    Ok(())
}

/// Serialized form of a walk: the flower, the variant, and the history.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WalkRecord {
    graph: Arc<HexGraph>,
    kind: WalkKind,
    history: Vec<Step>,
}

impl From<Walk> for WalkRecord {
    fn from(walk: Walk) -> WalkRecord {
        WalkRecord {
            graph: walk.engine.graph().clone(),
            history: walk.engine.history().to_vec(),
            kind: walk.kind,
        }
    }
}

impl TryFrom<WalkRecord> for Walk {
    type Error = ConfigurationError;

    fn try_from(record: WalkRecord) -> Result<Walk, ConfigurationError> {
        let WalkRecord {
            graph,
            kind,
            history,
        } = record;
        kind.check_category(&graph)?;

        if history.is_empty() {
            return Err(ConfigurationError::InvalidHistory(
                "missing start record".to_string(),
            ));
        }
        if let Some((i, step)) = history
            .iter()
            .enumerate()
            .find(|(i, step)| step.step_num as usize != *i)
        {
            return Err(ConfigurationError::InvalidHistory(format!(
                "record {} has step number {}",
                i, step.step_num
            )));
        }

        check_steps_follow_graph(&graph, &history)?;

        let taken = history.len() - 1;
        match &kind {
            WalkKind::Basic { length } => {
                if !(MIN_LENGTH..=MAX_LENGTH).contains(length) {
                    return Err(ConfigurationError::LengthOutOfRange(*length));
                }
                if taken > *length as usize {
                    return Err(ConfigurationError::InvalidHistory(format!(
                        "{} steps taken on a walk of length {}",
                        taken, length
                    )));
                }
            }
            WalkKind::SelfTerminating { start_zone } => {
                let candidates = check_terminating_layout(&graph, start_zone)?;
                if !candidates.contains(&history[0].hex_id) {
                    return Err(ConfigurationError::InvalidHistory(format!(
                        "start hex {} is not a '{}' hex",
                        history[0].hex_id, start_zone
                    )));
                }
                let early_end = history[..taken]
                    .iter()
                    .find(|step| is_terminus(graph.node(step.hex_id).zone.zone_type()));
                if let Some(step) = early_end {
                    return Err(ConfigurationError::InvalidHistory(format!(
                        "walk continued past terminus hex {} at step {}",
                        step.hex_id, step.step_num
                    )));
                }
            }
        }

        Ok(Walk {
            engine: WalkEngine::resume(graph, history),
            kind,
        })
    }
}
