/// Flower Linter: validates hex flower files and flags layouts that walk badly.
///
/// Usage: flower_linter <flower.ron | flower_dir>
use hex_flower::core::graph::{FlowerCategory, HexGraph};
use hex_flower::core::walk::{is_terminus, DEFAULT_START_ZONE};
use hex_flower::schema::hex::HexId;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: flower_linter <flower.ron | flower_dir>");
        process::exit(0);
    }

    let root = Path::new(&args[1]);
    let mut files = Vec::new();
    if root.is_file() {
        files.push(root.to_path_buf());
    } else if root.is_dir() {
        collect_ron_files(root, &mut files);
    } else {
        eprintln!("ERROR: Path '{}' does not exist", args[1]);
        process::exit(1);
    }
    files.sort();

    let mut errors = 0;
    let mut warnings = 0;
    for path in &files {
        match HexGraph::load_from_ron(path) {
            Ok(graph) => {
                let blocked: usize = graph
                    .nodes()
                    .iter()
                    .map(|n| n.adjacency.blocked_count())
                    .sum();
                println!(
                    "{}: {} flower, {} dice, {} blocked sides",
                    path.display(),
                    graph.category(),
                    graph.dice(),
                    blocked
                );
                for (zone_type, count) in graph.zone_type_counts() {
                    println!("    {:<12} {}", zone_type, count);
                }
                for warning in lint_flower(&graph) {
                    println!("  WARNING: {}", warning);
                    warnings += 1;
                }
            }
            Err(e) => {
                println!("  ERROR: {}: {}", path.display(), e);
                errors += 1;
            }
        }
    }

    println!(
        "\nSummary: {} files, {} errors, {} warnings",
        files.len(),
        errors,
        warnings
    );
    process::exit(if errors == 0 { 0 } else { 1 });
}

fn collect_ron_files(dir: &Path, files: &mut Vec<PathBuf>) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                collect_ron_files(&path, files);
            } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                files.push(path);
            }
        }
    }
}

fn lint_flower(graph: &HexGraph) -> Vec<String> {
    let mut warnings = Vec::new();

    let mut entered: FxHashSet<HexId> = FxHashSet::default();
    for node in graph.nodes() {
        let open: Vec<HexId> = node.adjacency.iter().filter_map(|(_, t)| t).collect();
        if open.is_empty() {
            warnings.push(format!("hex {} has every side closed", node.id));
        }
        entered.extend(open.into_iter().filter(|t| *t != node.id));
    }
    for id in HexId::all() {
        if !entered.contains(&id) {
            warnings.push(format!("hex {} cannot be entered from any other hex", id));
        }
    }

    if graph.category() == FlowerCategory::Terminating {
        if graph.hexes_of_type(DEFAULT_START_ZONE).is_empty() {
            warnings.push(format!(
                "no '{}' hexes; walks need an explicit start zone",
                DEFAULT_START_ZONE
            ));
        }
        let termini = graph
            .nodes()
            .iter()
            .filter(|n| is_terminus(n.zone.zone_type()))
            .count();
        if termini == 0 {
            warnings.push("no terminus hexes; walks on this flower never end".to_string());
        } else if termini > 1 {
            warnings.push(format!(
                "{} terminus hexes; more than one skews how long walks last",
                termini
            ));
        }
    }

    warnings
}
