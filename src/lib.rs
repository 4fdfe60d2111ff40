//! Hex Flower: a 19-hex graph walked by dice, for tabletop game mechanics.
//!
//! A validated [`HexGraph`](core::graph::HexGraph) is shared read-only by any
//! number of walks. Each [`Walk`](core::walk::Walk) rolls the flower's dice,
//! looks the roll up in its bias table, and moves across the chosen side of
//! the current hex unless that side is closed.

pub mod core;
pub mod schema;
