//! # blackvol
//!
//! Machine-precision Black implied volatility.
//!
//! Given an option price together with forward, strike and expiry, recovers
//! the unique non-negative volatility σ for which Black's formula
//! reproduces the price, to full IEEE-754 double precision in a bounded,
//! input-independent number of iterations (Jäckel's "Let's Be Rational"
//! algorithm: rational initial guess + at most two Householder(3) steps).
//!
//! ## Architecture
//!
//! - **`erf`** — Cody rational approximations for erf/erfc/erfcx
//! - **`normal`** — standard normal pdf, cdf (with asymptotic tail), and
//!   AS-241 inverse cdf
//! - **`black`** — normalized Black call value and vega in four
//!   cancellation-free evaluation regimes
//! - **`implied`** — the inversion engine and its public wrappers
//!
//! ## Example
//!
//! ```
//! use blackvol::{black_price, BlackImpliedVol, OptionType};
//!
//! let price = black_price(100.0, 105.0, 0.25, 0.5, OptionType::Call)?;
//! let iv = BlackImpliedVol::compute(price, 100.0, 105.0, 0.5, OptionType::Call)?;
//! assert!((iv.0 - 0.25).abs() < 1e-13);
//! # Ok::<(), blackvol::VolError>(())
//! ```

pub mod black;
pub mod erf;
pub mod error;
pub mod implied;
pub mod normal;
pub mod types;

mod constants;
mod rational_cubic;
mod validate;

pub use black::{normalized_black_call, normalized_vega};
pub use error::{Result, VolError};
pub use implied::{black_price, normalized_implied_black_vol, BlackImpliedVol};
pub use types::{OptionType, Vol};
