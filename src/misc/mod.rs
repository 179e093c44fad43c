//! Numerical utilities
mod func;
mod quad;
pub mod root_finding;
mod x2;

pub use func::*;
pub use quad::{quad, quad_eps};
pub use x2::x2_test;
