//! Shared primitive types used across the entire simulation.

/// A stable, unique identifier for a monitored region.
pub type RegionId = u32;

/// The canonical run identifier.
pub type RunId = String;

/// A step counter. One step = one batch advance of every region.
pub type Step = u64;
