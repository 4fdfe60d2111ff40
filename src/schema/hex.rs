use serde::{Deserialize, Serialize};
use std::fmt;

use super::zone::Zone;

/// Number of hexes in a flower.
pub const HEX_COUNT: usize = 19;

/// Identifier of one of the 19 hexes, always in `1..=19`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HexId(u8);

impl HexId {
    pub const FIRST: HexId = HexId(1);

    /// Returns `None` when `value` is outside `1..=19`.
    pub fn new(value: i64) -> Option<HexId> {
        if (1..=HEX_COUNT as i64).contains(&value) {
            Some(HexId(value as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position in the flower's node table.
    pub(crate) fn index(self) -> usize {
        usize::from(self.0) - 1
    }

    /// All ids in ascending order.
    pub fn all() -> impl Iterator<Item = HexId> {
        (1..=HEX_COUNT as u8).map(HexId)
    }
}

impl TryFrom<u8> for HexId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        HexId::new(i64::from(value))
            .ok_or_else(|| format!("hex id {} is outside 1..=19", value))
    }
}

impl From<HexId> for u8 {
    fn from(id: HexId) -> u8 {
        id.0
    }
}

impl fmt::Display for HexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A side of a hex, lettered clockwise from the top.
///
/// a: top, b: upper right, c: lower right, d: bottom, e: lower left,
/// f: upper left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Edge {
    pub const ALL: [Edge; 6] = [Edge::A, Edge::B, Edge::C, Edge::D, Edge::E, Edge::F];

    pub fn key(&self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
            Self::D => "d",
            Self::E => "e",
            Self::F => "f",
        }
    }

    pub fn from_key(key: &str) -> Option<Edge> {
        Edge::ALL.into_iter().find(|edge| edge.key() == key)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Neighbor table of a hex. An empty slot blocks movement across that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Adjacency([Option<HexId>; 6]);

impl Adjacency {
    pub fn new(slots: [Option<HexId>; 6]) -> Self {
        Self(slots)
    }

    pub fn get(&self, edge: Edge) -> Option<HexId> {
        self.0[edge.slot()]
    }

    pub fn is_blocked(&self, edge: Edge) -> bool {
        self.get(edge).is_none()
    }

    /// Pairs of (edge, neighbor) in a..f order.
    pub fn iter(&self) -> impl Iterator<Item = (Edge, Option<HexId>)> + '_ {
        Edge::ALL.into_iter().map(move |edge| (edge, self.get(edge)))
    }

    pub fn blocked_count(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_none()).count()
    }
}

/// One hex of a validated flower.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: HexId,
    pub zone: Zone,
    pub adjacency: Adjacency,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_id_bounds() {
        assert!(HexId::new(0).is_none());
        assert!(HexId::new(20).is_none());
        assert!(HexId::new(-3).is_none());
        assert_eq!(HexId::new(1), Some(HexId::FIRST));
        assert_eq!(HexId::new(19).map(HexId::get), Some(19));
    }

    #[test]
    fn hex_id_all_is_ordered() {
        let ids: Vec<u8> = HexId::all().map(HexId::get).collect();
        assert_eq!(ids, (1..=19).collect::<Vec<u8>>());
    }

    #[test]
    fn hex_id_rejects_out_of_range_on_deserialize() {
        assert!(ron::from_str::<HexId>("7").is_ok());
        assert!(ron::from_str::<HexId>("0").is_err());
        assert!(ron::from_str::<HexId>("42").is_err());
    }

    #[test]
    fn edge_keys() {
        let keys: Vec<&str> = Edge::ALL.iter().map(Edge::key).collect();
        assert_eq!(keys, vec!["a", "b", "c", "d", "e", "f"]);
        assert_eq!(Edge::from_key("d"), Some(Edge::D));
        assert_eq!(Edge::from_key("g"), None);
        assert_eq!(Edge::from_key("A"), None);
    }

    #[test]
    fn adjacency_lookup() {
        let two = HexId::new(2);
        let adjacency = Adjacency::new([two, None, None, HexId::new(19), None, two]);
        assert_eq!(adjacency.get(Edge::A), two);
        assert!(adjacency.is_blocked(Edge::B));
        assert_eq!(adjacency.get(Edge::D).map(HexId::get), Some(19));
        assert_eq!(adjacency.blocked_count(), 3);
        assert_eq!(adjacency.iter().count(), 6);
    }
}
