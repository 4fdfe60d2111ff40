//! The hex flower graph: 19 validated nodes plus category and dice.

use log::debug;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::core::dice::{DiceProfile, Die};
use crate::schema::flower::{FlowerSpec, NodeSpec, ZoneSpec};
use crate::schema::hex::{Adjacency, Edge, HexId, Node, HEX_COUNT};
use crate::schema::zone::{Zone, ZoneError};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("unknown flower category '{0}'")]
    UnknownCategory(String),
    #[error("unsupported dice combination {0:?}")]
    UnsupportedDice(Vec<String>),
    #[error("bias table of {0} does not match its dice")]
    BiasTableMismatch(DiceProfile),
    #[error("expected 19 hexes, found {0}")]
    WrongHexCount(usize),
    #[error("hex id {0} is outside 1..=19")]
    IdOutOfRange(i64),
    #[error("hex id {0} appears more than once")]
    DuplicateId(u8),
    #[error("hex {hex}: zone: {source}")]
    Zone {
        hex: u8,
        #[source]
        source: ZoneError,
    },
    #[error("hex {hex}: adjacency is missing side '{edge}'")]
    MissingEdge { hex: u8, edge: Edge },
    #[error("hex {hex}: adjacency has unknown side '{key}'")]
    UnknownEdge { hex: u8, key: String },
    #[error("hex {hex}: adjacency side '{edge}' points to {target}, outside 1..=19")]
    NeighborOutOfRange { hex: u8, edge: Edge, target: i64 },
}

#[derive(Debug, Error)]
pub enum FlowerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid flower: {0}")]
    Validation(#[from] ValidationError),
}

/// What a flower is used for. Decides which walks may run on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowerCategory {
    Normal,
    Basic,
    Terrain,
    Weather,
    Terminating,
}

impl FlowerCategory {
    pub fn parse(input: &str) -> Option<FlowerCategory> {
        match input {
            "normal" => Some(Self::Normal),
            "basic" => Some(Self::Basic),
            "terrain" => Some(Self::Terrain),
            "weather" => Some(Self::Weather),
            "terminating" => Some(Self::Terminating),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Basic => "basic",
            Self::Terrain => "terrain",
            Self::Weather => "weather",
            Self::Terminating => "terminating",
        }
    }
}

impl fmt::Display for FlowerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated, immutable 19-hex flower.
///
/// Nodes are stored in id order, so `node(id)` is a direct index. Share it
/// between walks behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FlowerSpec", into = "FlowerSpec")]
pub struct HexGraph {
    nodes: Vec<Node>,
    category: FlowerCategory,
    dice: DiceProfile,
}

impl HexGraph {
    /// Validate a construction payload and build the graph.
    ///
    /// Stops at the first bad record; nothing is returned on failure.
    pub fn construct(flower: &FlowerSpec) -> Result<HexGraph, ValidationError> {
        let category = FlowerCategory::parse(&flower.category)
            .ok_or_else(|| ValidationError::UnknownCategory(flower.category.clone()))?;
        let dice = parse_dice(&flower.dice)?;

        if flower.hexes.len() != HEX_COUNT {
            return Err(ValidationError::WrongHexCount(flower.hexes.len()));
        }

        let mut seen = FxHashSet::default();
        let mut slots: Vec<Option<Node>> = vec![None; HEX_COUNT];
        for record in &flower.hexes {
            let node = build_node(record)?;
            if !seen.insert(node.id) {
                return Err(ValidationError::DuplicateId(node.id.get()));
            }
            let index = node.id.index();
            slots[index] = Some(node);
        }

        // 19 distinct ids in 1..=19 fill every slot.
        let nodes: Vec<Node> = slots.into_iter().flatten().collect();

        debug!(
            "hex flower built: category={}, dice={}, blocked sides={}",
            category,
            dice,
            nodes.iter().map(|n| n.adjacency.blocked_count()).sum::<usize>()
        );

        Ok(HexGraph {
            nodes,
            category,
            dice,
        })
    }

    /// Load and validate a flower from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<HexGraph, FlowerError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse and validate a flower from a RON string.
    pub fn parse_ron(input: &str) -> Result<HexGraph, FlowerError> {
        let flower: FlowerSpec = ron::from_str(input)?;
        Ok(Self::construct(&flower)?)
    }

    pub fn node(&self, id: HexId) -> &Node {
        &self.nodes[id.index()]
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn category(&self) -> FlowerCategory {
        self.category
    }

    pub fn dice(&self) -> DiceProfile {
        self.dice
    }

    /// Ids of every hex whose zone type is `zone_type`, ascending.
    pub fn hexes_of_type(&self, zone_type: &str) -> Vec<HexId> {
        self.nodes
            .iter()
            .filter(|n| n.zone.zone_type() == zone_type)
            .map(|n| n.id)
            .collect()
    }

    /// Number of hexes per zone type.
    pub fn zone_type_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for node in &self.nodes {
            *counts.entry(node.zone.zone_type()).or_insert(0) += 1;
        }
        counts
    }
}

impl TryFrom<FlowerSpec> for HexGraph {
    type Error = ValidationError;

    fn try_from(flower: FlowerSpec) -> Result<Self, Self::Error> {
        HexGraph::construct(&flower)
    }
}

impl From<HexGraph> for FlowerSpec {
    fn from(graph: HexGraph) -> FlowerSpec {
        let hexes = graph
            .nodes
            .iter()
            .map(|node| NodeSpec {
                id: i64::from(node.id.get()),
                zone: ZoneSpec {
                    label: node.zone.label().to_string(),
                    zone_type: node.zone.zone_type().to_string(),
                    color: Some(node.zone.color().to_string()),
                    icon: node.zone.icon().map(|p| p.display().to_string()),
                    effect: node.zone.effect().map(str::to_string),
                },
                adjacency: node
                    .adjacency
                    .iter()
                    .map(|(edge, target)| {
                        (edge.key().to_string(), target.map(|t| i64::from(t.get())))
                    })
                    .collect(),
            })
            .collect();

        FlowerSpec {
            category: graph.category.name().to_string(),
            dice: graph.dice.dice().iter().map(|d| d.name().to_string()).collect(),
            hexes,
        }
    }
}

impl fmt::Display for HexGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} hex flower, {} dice", self.category, self.dice)?;
        for node in &self.nodes {
            let sides: Vec<String> = node
                .adjacency
                .iter()
                .map(|(edge, target)| match target {
                    Some(t) => format!("{}:{}", edge, t),
                    None => format!("{}:-", edge),
                })
                .collect();
            writeln!(f, "  {:>2} {} [{}]", node.id.get(), node.zone, sides.join(" "))?;
        }
        Ok(())
    }
}

fn parse_dice(names: &[String]) -> Result<DiceProfile, ValidationError> {
    let unsupported = || ValidationError::UnsupportedDice(names.to_vec());
    let dice = names
        .iter()
        .map(|name| Die::parse(name))
        .collect::<Option<Vec<Die>>>()
        .ok_or_else(unsupported)?;
    let profile = DiceProfile::from_dice(&dice).ok_or_else(unsupported)?;
    if !profile.table_matches_dice() {
        return Err(ValidationError::BiasTableMismatch(profile));
    }
    Ok(profile)
}

fn build_node(record: &NodeSpec) -> Result<Node, ValidationError> {
    let id = HexId::new(record.id).ok_or(ValidationError::IdOutOfRange(record.id))?;
    let hex = id.get();

    let z = &record.zone;
    let zone = Zone::new(
        &z.label,
        &z.zone_type,
        z.color.as_deref(),
        z.icon.as_deref(),
        z.effect.as_deref(),
    )
    .map_err(|source| ValidationError::Zone { hex, source })?;

    for key in record.adjacency.keys() {
        if Edge::from_key(key).is_none() {
            return Err(ValidationError::UnknownEdge {
                hex,
                key: key.clone(),
            });
        }
    }

    let mut slots = [None; 6];
    for (slot, edge) in slots.iter_mut().zip(Edge::ALL) {
        let target = record
            .adjacency
            .get(edge.key())
            .ok_or(ValidationError::MissingEdge { hex, edge })?;
        *slot = match target {
            Some(value) => Some(HexId::new(*value).ok_or(ValidationError::NeighborOutOfRange {
                hex,
                edge,
                target: *value,
            })?),
            None => None,
        };
    }

    Ok(Node {
        id,
        zone,
        adjacency: Adjacency::new(slots),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A flower where every side of every hex is blocked.
    pub(crate) fn closed_flower(category: &str, dice: &[&str]) -> FlowerSpec {
        let hexes = (1..=19)
            .map(|id| NodeSpec {
                id,
                zone: ZoneSpec {
                    label: id.to_string(),
                    zone_type: "normal".to_string(),
                    color: None,
                    icon: None,
                    effect: None,
                },
                adjacency: Edge::ALL
                    .iter()
                    .map(|e| (e.key().to_string(), None))
                    .collect(),
            })
            .collect();
        FlowerSpec {
            category: category.to_string(),
            dice: dice.iter().map(|d| d.to_string()).collect(),
            hexes,
        }
    }

    pub(crate) fn set_zone(
        flower: &mut FlowerSpec,
        id: i64,
        zone_type: &str,
        effect: Option<&str>,
    ) {
        let record = &mut flower.hexes[(id - 1) as usize];
        record.zone.zone_type = zone_type.to_string();
        record.zone.effect = effect.map(str::to_string);
    }

    pub(crate) fn link(flower: &mut FlowerSpec, from: i64, edge: Edge, to: i64) {
        flower.hexes[(from - 1) as usize]
            .adjacency
            .insert(edge.key().to_string(), Some(to));
    }

    #[test]
    fn construct_valid_flower() {
        let mut flower = closed_flower("weather", &["d6", "d6"]);
        link(&mut flower, 1, Edge::A, 4);
        let graph = HexGraph::construct(&flower).unwrap();
        assert_eq!(graph.category(), FlowerCategory::Weather);
        assert_eq!(graph.dice(), DiceProfile::Standard);
        assert_eq!(graph.nodes().len(), 19);
        for (expected, id) in HexId::all().enumerate() {
            let node = graph.node(id);
            assert_eq!(node.id, id);
            assert_eq!(usize::from(id.get()), expected + 1);
            assert_eq!(node.adjacency.iter().count(), 6);
        }
        assert_eq!(graph.node(HexId::FIRST).adjacency.get(Edge::A), HexId::new(4));
    }

    #[test]
    fn records_out_of_order_are_indexed_by_id() {
        let mut flower = closed_flower("basic", &["d6"]);
        flower.hexes.reverse();
        flower.hexes[0].zone.label = "top".to_string();
        let graph = HexGraph::construct(&flower).unwrap();
        let top = HexId::new(19).unwrap();
        assert_eq!(graph.node(top).zone.label(), "top");
    }

    #[test]
    fn unknown_category_rejected() {
        let flower = closed_flower("court", &["d6"]);
        assert_eq!(
            HexGraph::construct(&flower),
            Err(ValidationError::UnknownCategory("court".to_string()))
        );
    }

    #[test]
    fn unsupported_dice_rejected() {
        for dice in [&["d4", "d4"][..], &["d20"][..], &[][..], &["d6", "d6", "d6"][..]] {
            let flower = closed_flower("basic", dice);
            assert!(matches!(
                HexGraph::construct(&flower),
                Err(ValidationError::UnsupportedDice(_))
            ));
        }
    }

    #[test]
    fn wrong_hex_count_rejected() {
        let mut flower = closed_flower("basic", &["d6"]);
        flower.hexes.pop();
        assert_eq!(
            HexGraph::construct(&flower),
            Err(ValidationError::WrongHexCount(18))
        );
    }

    #[test]
    fn id_out_of_range_rejected() {
        let mut flower = closed_flower("basic", &["d6"]);
        flower.hexes[4].id = 20;
        assert_eq!(
            HexGraph::construct(&flower),
            Err(ValidationError::IdOutOfRange(20))
        );
        flower.hexes[4].id = 0;
        assert_eq!(
            HexGraph::construct(&flower),
            Err(ValidationError::IdOutOfRange(0))
        );
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut flower = closed_flower("basic", &["d6"]);
        flower.hexes[18].id = 3;
        assert_eq!(
            HexGraph::construct(&flower),
            Err(ValidationError::DuplicateId(3))
        );
    }

    #[test]
    fn bad_zone_reports_hex() {
        let mut flower = closed_flower("basic", &["d6"]);
        flower.hexes[6].zone.color = Some("#12345".to_string());
        assert_eq!(
            HexGraph::construct(&flower),
            Err(ValidationError::Zone {
                hex: 7,
                source: ZoneError::InvalidColor("#12345".to_string()),
            })
        );

        let mut flower = closed_flower("basic", &["d6"]);
        flower.hexes[2].zone.label = String::new();
        assert_eq!(
            HexGraph::construct(&flower),
            Err(ValidationError::Zone {
                hex: 3,
                source: ZoneError::EmptyLabel,
            })
        );
    }

    #[test]
    fn missing_edge_rejected() {
        let mut flower = closed_flower("basic", &["d6"]);
        flower.hexes[9].adjacency.remove("c");
        assert_eq!(
            HexGraph::construct(&flower),
            Err(ValidationError::MissingEdge {
                hex: 10,
                edge: Edge::C,
            })
        );
    }

    #[test]
    fn unknown_edge_rejected() {
        let mut flower = closed_flower("basic", &["d6"]);
        flower.hexes[1].adjacency.insert("g".to_string(), Some(3));
        assert_eq!(
            HexGraph::construct(&flower),
            Err(ValidationError::UnknownEdge {
                hex: 2,
                key: "g".to_string(),
            })
        );
    }

    #[test]
    fn neighbor_out_of_range_rejected() {
        let mut flower = closed_flower("basic", &["d6"]);
        flower.hexes[11]
            .adjacency
            .insert("e".to_string(), Some(25));
        assert_eq!(
            HexGraph::construct(&flower),
            Err(ValidationError::NeighborOutOfRange {
                hex: 12,
                edge: Edge::E,
                target: 25,
            })
        );
    }

    #[test]
    fn hexes_of_type_and_counts() {
        let mut flower = closed_flower("terminating", &["d6", "d8"]);
        set_zone(&mut flower, 1, "start", None);
        set_zone(&mut flower, 2, "start", None);
        set_zone(&mut flower, 19, "end", Some("Done"));
        let graph = HexGraph::construct(&flower).unwrap();
        let starts: Vec<u8> = graph.hexes_of_type("start").into_iter().map(HexId::get).collect();
        assert_eq!(starts, vec![1, 2]);
        let counts = graph.zone_type_counts();
        assert_eq!(counts["normal"], 16);
        assert_eq!(counts["end"], 1);
    }

    #[test]
    fn serializes_back_to_its_payload() {
        let mut flower = closed_flower("terrain", &["d4", "d4", "d4"]);
        link(&mut flower, 10, Edge::B, 11);
        set_zone(&mut flower, 10, "normal", Some("Forest"));
        let graph = HexGraph::construct(&flower).unwrap();
        let text = ron::to_string(&graph).unwrap();
        let back: HexGraph = ron::from_str(&text).unwrap();
        assert_eq!(back, graph);
    }

    #[test]
    fn display_lists_every_hex() {
        let graph = HexGraph::construct(&closed_flower("normal", &["d8"])).unwrap();
        let text = graph.to_string();
        assert!(text.starts_with("normal hex flower, non-uniform (d8) dice"));
        assert_eq!(text.lines().count(), 20);
    }
}
