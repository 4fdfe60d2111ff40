//! Data records: hexes, zones, and the flower construction payload.

pub mod flower;
pub mod hex;
pub mod zone;
