/// Walk Runner: runs one walk on a flower file and prints its steps.
///
/// Usage: walk_runner --flower <file.ron> [--length <10..75>] [--start <1..19>]
///                    [--start-zone <type>] [--seed <n>] [--header]
///
/// Output is one `step_num,hex_id,effect` row per step, start included.
/// Set RUST_LOG=debug to see each roll on stderr.
use hex_flower::core::engine::{Step, StepReport};
use hex_flower::core::graph::{FlowerCategory, HexGraph};
use hex_flower::core::observer::{LogObserver, WalkObserver};
use hex_flower::core::walk::Walk;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::process;
use std::sync::Arc;

const USAGE: &str = "Usage: walk_runner --flower <file.ron> [--length <10..75>] [--start <1..19>] [--start-zone <type>] [--seed <n>] [--header]";

/// Prints a row per new step and keeps the log observer informed.
struct RowPrinter {
    log: LogObserver,
}

impl RowPrinter {
    fn print(step: &Step) {
        let effect = step.effect.as_deref().unwrap_or("");
        if effect.contains(',') || effect.contains('"') {
            println!(
                "{},{},\"{}\"",
                step.step_num,
                step.hex_id,
                effect.replace('"', "\"\"")
            );
        } else {
            println!("{},{},{}", step.step_num, step.hex_id, effect);
        }
    }
}

impl WalkObserver for RowPrinter {
    fn walk_started(&mut self, walk: &Walk) {
        self.log.walk_started(walk);
    }

    fn step_taken(&mut self, report: &StepReport) {
        self.log.step_taken(report);
        Self::print(&report.step);
    }

    fn walk_finished(&mut self, walk: &Walk) {
        self.log.walk_finished(walk);
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> T {
    let value = value.unwrap_or_else(|| {
        eprintln!("Error: {} needs a value", flag);
        process::exit(1);
    });
    value.parse().unwrap_or_else(|_| {
        eprintln!("Error: {} must be a number, got '{}'", flag, value);
        process::exit(1);
    })
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    let mut flower = None;
    let mut length: u32 = 20;
    let mut start = None;
    let mut start_zone = None;
    let mut seed = None;
    let mut header = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--flower" if i + 1 < args.len() => {
                i += 1;
                flower = Some(args[i].clone());
            }
            "--length" => {
                length = parse_number("--length", args.get(i + 1));
                i += 1;
            }
            "--start" => {
                start = Some(parse_number::<i64>("--start", args.get(i + 1)));
                i += 1;
            }
            "--start-zone" if i + 1 < args.len() => {
                i += 1;
                start_zone = Some(args[i].clone());
            }
            "--seed" => {
                seed = Some(parse_number::<u64>("--seed", args.get(i + 1)));
                i += 1;
            }
            "--header" => header = true,
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", USAGE);
                process::exit(1);
            }
        }
        i += 1;
    }

    let flower_path = flower.unwrap_or_else(|| {
        eprintln!("Error: --flower is required");
        eprintln!("{}", USAGE);
        process::exit(1);
    });

    let graph = HexGraph::load_from_ron(Path::new(&flower_path)).unwrap_or_else(|e| {
        eprintln!("Error loading flower '{}': {}", flower_path, e);
        process::exit(1);
    });
    let graph = Arc::new(graph);

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let walk = match graph.category() {
        FlowerCategory::Terminating => {
            Walk::self_terminating(graph, start_zone.as_deref(), &mut rng)
        }
        _ => Walk::basic(graph, length, start),
    };
    let mut walk = walk.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    if header {
        println!("step_num,hex_id,effect");
    }
    for step in walk.history() {
        RowPrinter::print(step);
    }
    let mut printer = RowPrinter {
        log: LogObserver::default(),
    };
    walk.run_observed(&mut rng, &mut printer);
}
