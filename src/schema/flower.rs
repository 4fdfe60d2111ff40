//! Construction payload for a hex flower, as handed over by a loader.
//!
//! Fields stay loosely typed. `HexGraph` re-checks every one of
//! them and reports the offending hex and field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::zone::DEFAULT_ZONE_TYPE;

fn default_zone_type() -> String {
    DEFAULT_ZONE_TYPE.to_string()
}

/// Zone fields of one record. Absent optionals are `None`, never `"null"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub label: String,
    #[serde(rename = "type", default = "default_zone_type")]
    pub zone_type: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub effect: Option<String>,
}

/// One hex record: id, zone, and side-keyed neighbor table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: i64,
    pub zone: ZoneSpec,
    pub adjacency: BTreeMap<String, Option<i64>>,
}

/// A whole flower: category, dice, and the 19 hex records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowerSpec {
    pub category: String,
    pub dice: Vec<String>,
    pub hexes: Vec<NodeSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_spec_defaults() {
        let parsed: ZoneSpec = ron::from_str(r#"(label: "3")"#).unwrap();
        assert_eq!(parsed.zone_type, "normal");
        assert!(parsed.color.is_none());
        assert!(parsed.icon.is_none());
        assert!(parsed.effect.is_none());
    }

    #[test]
    fn node_spec_from_ron() {
        let input = r#"(
            id: 5,
            zone: (label: "5", type: "start", color: Some("green")),
            adjacency: {"a": Some(14), "b": None, "c": Some(6), "d": None, "e": Some(2), "f": Some(1)},
        )"#;
        let parsed: NodeSpec = ron::from_str(input).unwrap();
        assert_eq!(parsed.id, 5);
        assert_eq!(parsed.zone.zone_type, "start");
        assert_eq!(parsed.zone.color.as_deref(), Some("green"));
        assert_eq!(parsed.adjacency.len(), 6);
        assert_eq!(parsed.adjacency["a"], Some(14));
        assert_eq!(parsed.adjacency["b"], None);
    }
}
