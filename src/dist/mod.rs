//! Probability distributions
mod bernoulli;
mod binomial;
mod geometric;
mod hypergeometric;
mod lognormal;
pub mod numeric;
mod poisson;
mod uniform;

pub use bernoulli::{Bernoulli, BernoulliError};
pub use binomial::{Binomial, BinomialError};
pub use geometric::{Geometric, GeometricError};
pub use hypergeometric::{Hypergeometric, HypergeometricError};
pub use lognormal::{LogNormal, LogNormalError};
pub use numeric::{Density, Epanechnikov, NumericContinuous, NumericError};
pub use poisson::{Poisson, PoissonError};
pub use uniform::{Uniform, UniformError};
