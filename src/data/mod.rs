//! Data utilities
mod stat;

pub use self::stat::BernoulliSuffStat;
pub use self::stat::GaussianSuffStat;
