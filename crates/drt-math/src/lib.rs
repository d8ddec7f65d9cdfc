//! drtrend math utilities.

pub mod math;

pub use math::logit::*;
pub use math::quantile::*;
