//! Probability lessons built on a small random-variable toolkit.
//!
//! The crate is organised the way the experiments are taught:
//!
//! - [`dist`] and [`traits`] provide random variables with densities, CDFs,
//!   quantiles and moments.
//! - [`dist::numeric`] derives all of those from nothing but a density.
//! - [`geometry`] estimates geometric probabilities by classifying uniform
//!   points into nested regions.
//! - [`frequency`], [`conditional`], [`summary`] and [`sensitivity`] hold the
//!   remaining experiments: coin and urn frequencies, Simpson's paradox,
//!   discrete distribution tables and log-normal parameter dependence.
//!
//! # Example
//!
//! Estimate the probability of landing in a circle inscribed in a square.
//!
//! ```
//! use probsim::geometry::presets;
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256Plus;
//!
//! let regions = presets::target(10.0, &[5.0]).unwrap();
//! let mut rng = Xoshiro256Plus::seed_from_u64(0x5EED);
//! let experiment = regions.run(50_000, &mut rng).unwrap();
//!
//! let inside = &experiment.regions()[0];
//! assert!((inside.theoretical - std::f64::consts::PI / 4.0).abs() < 1e-12);
//! assert!((inside.empirical - inside.theoretical).abs() < 0.01);
//! ```
#![warn(
    clippy::all,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::unseparated_literal_suffix,
    clippy::unreadable_literal,
    clippy::option_option,
    clippy::implicit_clone
)]

doc_comment::doctest!("../README.md");

pub mod conditional;
pub mod consts;
pub mod data;
pub mod dist;
pub mod frequency;
pub mod geometry;
pub mod misc;
pub mod prelude;
pub mod sensitivity;
pub mod summary;
mod test;
pub mod traits;

/// Implements `Display` for a type through its `From<&T> for String` impl
#[macro_export]
macro_rules! impl_display {
    ($kind: ty) => {
        impl ::std::fmt::Display for $kind {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(f, "{}", String::from(self))
            }
        }
    };
}
