//! Geometric probability: the chance that a uniform point lands in a region
//! is the region's share of the total area.
//!
//! A [`NestedRegions`] partitions a bounding [`Square`] with nested shapes.
//! Sampling it draws uniform points, assigns each to exactly one region and
//! compares the observed hit rates with the area ratios.
mod sampler;
mod shape;

pub mod presets;

pub use sampler::{
    Experiment, NestedRegions, Region, RegionError, RegionSummary,
    SamplerError,
};
pub use shape::{
    Disk, DiskError, Point, Shape, Square, SquareError, Triangle,
    TriangleError, ENCLOSE_TOL,
};
