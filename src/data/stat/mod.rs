mod bernoulli;
mod gaussian;

pub use bernoulli::*;
pub use gaussian::*;
