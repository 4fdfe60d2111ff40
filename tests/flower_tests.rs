/// Flower loading and validation integration tests.

use hex_flower::core::dice::DiceProfile;
use hex_flower::core::graph::{FlowerCategory, FlowerError, HexGraph, ValidationError};
use hex_flower::schema::hex::{Edge, HexId};
use hex_flower::schema::zone::ZoneColor;
use std::path::Path;

fn load(name: &str) -> HexGraph {
    let path = Path::new("tests/fixtures").join(name);
    HexGraph::load_from_ron(&path).unwrap()
}

fn hex(id: i64) -> HexId {
    HexId::new(id).unwrap()
}

#[test]
fn weather_flower_loads() {
    let graph = load("weather_flower.ron");
    assert_eq!(graph.category(), FlowerCategory::Weather);
    assert_eq!(graph.dice(), DiceProfile::Standard);
    assert_eq!(graph.nodes().len(), 19);

    for (node, id) in graph.nodes().iter().zip(HexId::all()) {
        assert_eq!(node.id, id);
        assert_eq!(node.adjacency.iter().count(), 6);
    }

    let blocked: usize = graph.nodes().iter().map(|n| n.adjacency.blocked_count()).sum();
    assert_eq!(blocked, 4);
    assert!(graph.node(hex(1)).adjacency.is_blocked(Edge::D));
    assert_eq!(graph.node(hex(1)).adjacency.get(Edge::A), Some(hex(5)));

    let storm = &graph.node(hex(19)).zone;
    assert_eq!(storm.effect(), Some("Hurricane"));
    assert_eq!(storm.color(), &ZoneColor::Named("dark red".to_string()));
    assert_eq!(graph.zone_type_counts().get("normal"), Some(&19));
}

#[test]
fn volcano_flower_loads() {
    let graph = load("volcano_flower.ron");
    assert_eq!(graph.category(), FlowerCategory::Terminating);
    assert_eq!(graph.dice(), DiceProfile::Special);
    assert_eq!(graph.hexes_of_type("start"), vec![hex(1), hex(2), hex(3)]);
    assert_eq!(graph.hexes_of_type("eruption"), vec![hex(19)]);
    // zone without an effect
    assert_eq!(graph.node(hex(4)).zone.effect(), None);
}

#[test]
fn flower_survives_ron_round_trip() {
    let graph = load("weather_flower.ron");
    let text = ron::ser::to_string_pretty(&graph, ron::ser::PrettyConfig::default()).unwrap();
    let reloaded = HexGraph::parse_ron(&text).unwrap();
    assert_eq!(graph, reloaded);
}

#[test]
fn broken_neighbor_is_reported_with_hex_and_side() {
    let text = std::fs::read_to_string("tests/fixtures/weather_flower.ron").unwrap();
    let broken = text.replacen("\"a\": Some(5)", "\"a\": Some(23)", 1);
    match HexGraph::parse_ron(&broken) {
        Err(FlowerError::Validation(ValidationError::NeighborOutOfRange { hex, edge, target })) => {
            assert_eq!(hex, 1);
            assert_eq!(edge, Edge::A);
            assert_eq!(target, 23);
        }
        other => panic!("expected NeighborOutOfRange, got {:?}", other),
    }
}

#[test]
fn unsupported_dice_are_rejected() {
    let text = std::fs::read_to_string("tests/fixtures/weather_flower.ron").unwrap();
    let broken = text.replacen("[\"d6\", \"d6\"]", "[\"d6\", \"d4\"]", 1);
    assert!(matches!(
        HexGraph::parse_ron(&broken),
        Err(FlowerError::Validation(ValidationError::UnsupportedDice(_)))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let result = HexGraph::load_from_ron(Path::new("tests/fixtures/no_such_flower.ron"));
    assert!(matches!(result, Err(FlowerError::Io(_))));
}

#[test]
fn textual_nulls_in_a_flower_file_are_absent() {
    let text = std::fs::read_to_string("tests/fixtures/weather_flower.ron").unwrap();
    let edited = text
        .replacen("Some(\"dark red\")", "Some(\"null\")", 1)
        .replacen("Some(\"Hurricane\")", "Some(\"null\")", 1);
    let graph = HexGraph::parse_ron(&edited).unwrap();
    let zone = &graph.node(hex(19)).zone;
    assert_eq!(zone.color(), &ZoneColor::default());
    assert_eq!(zone.effect(), None);
}
