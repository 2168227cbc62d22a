//! Implied volatility extraction from option prices.
//!
//! The Black (lognormal) model is inverted with Jäckel's rational
//! algorithm: a four-branch initial guess accurate to ~10⁻⁴ followed by at
//! most two Householder(3) steps, giving full double precision in bounded,
//! input-independent work.

pub mod black;
pub(crate) mod solver;

pub use black::{black_price, normalized_implied_black_vol, BlackImpliedVol};
