//! Core domain types.
//!
//! # Newtype Strategy
//!
//! **Outputs use newtypes** — [`Vol`] wraps the extracted volatility so a
//! caller can't silently confuse it with a price or a variance.
//!
//! **Inputs use bare `f64`** — `compute(price: f64, forward: f64, ...)`
//! accepts raw floats for ergonomics; the caller already knows what they are
//! passing, and parameter names document the rest.
//!
//! # Why no `Eq` or `Ord`?
//! [`Vol`] wraps `f64`, which does not implement `Eq`/`Ord` because `NaN`
//! breaks total ordering. Only `PartialEq`/`PartialOrd` are derived.

use serde::{Deserialize, Serialize};

/// Option type: call or put.
///
/// Selects the payoff branch and, internally, the sign q ∈ {+1, −1} used by
/// the normalization transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Right to buy at the strike price.
    Call,
    /// Right to sell at the strike price.
    Put,
}

impl OptionType {
    /// Payoff sign: +1 for a call, −1 for a put.
    pub(crate) fn sign(self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

/// Implied volatility σ, an annualized standard deviation.
///
/// A value of 0.20 represents 20% annualized volatility.
///
/// # Examples
/// ```
/// use blackvol::types::Vol;
/// let vol = Vol(0.20);
/// assert_eq!(vol.0, 0.20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Vol(pub f64);
