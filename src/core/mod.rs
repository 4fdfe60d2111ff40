//! Runtime: graph construction, dice, the step engine, and walks.

pub mod dice;
pub mod engine;
pub mod graph;
pub mod observer;
pub mod walk;
