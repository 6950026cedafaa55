//! Orchestration library backing the `analysis-driver` binary: wires the
//! gridding, center-finding, and pressure-solving crates into a running
//! VORTRAC analysis cycle (spec.md §4.6, §5).

pub mod driver;
pub mod grid_geometry;
pub mod pipeline;
pub mod ring_sampling;
pub mod search;

pub use driver::{AnalysisDriver, CycleOutcome};
