//! Black (lognormal) implied volatility via Jäckel's "Let's Be Rational"
//! algorithm, and the matching undiscounted Black pricer.
//!
//! # Formula
//! The undiscounted Black call price is
//! ```text
//! C(F, K, T, σ) = F·Φ(d₁) − K·Φ(d₂)
//! where d₁,₂ = ln(F/K)/(σ√T) ± σ√T/2
//! ```
//! Internally everything is expressed through the normalized call
//! b(x, s) = C/√(F·K) with x = ln(F/K) and s = σ√T; see [`crate::black`].
//!
//! # References
//! - Jäckel, P. "Let's Be Rational" (2013)

use crate::black::normalized_black_call;
use crate::constants::IMPLIED_VOLATILITY_MAX_ITERATIONS;
use crate::error::VolError;
use crate::implied::solver::unchecked_normalized_implied_vol;
use crate::types::{OptionType, Vol};
use crate::validate::{validate_finite, validate_non_negative, validate_positive};

/// Black (lognormal) implied volatility calculator.
///
/// Recovers σ from an observed price to full double precision in at most
/// two Householder iterations, for any input inside the no-arbitrage
/// bounds.
#[derive(Debug)]
pub struct BlackImpliedVol;

impl BlackImpliedVol {
    /// Compute Black implied volatility from an option price.
    ///
    /// # Arguments
    /// * `option_price` — Undiscounted market price (must be ≥ 0)
    /// * `forward` — Forward price at expiry (must be > 0)
    /// * `strike` — Strike price (must be > 0)
    /// * `expiry` — Time to expiry in years (must be > 0)
    /// * `option_type` — Call or Put
    ///
    /// # Errors
    /// * [`VolError::InvalidInput`] for NaN/infinite or non-positive inputs
    /// * [`VolError::BelowIntrinsic`] if the price violates the lower
    ///   no-arbitrage bound max(q·(F−K), 0)
    /// * [`VolError::AboveMaximum`] if the price reaches the upper bound
    ///   (F for calls, K for puts)
    ///
    /// # Examples
    /// ```
    /// use blackvol::{BlackImpliedVol, OptionType};
    ///
    /// let iv = BlackImpliedVol::compute(7.965567455405798, 100.0, 100.0, 1.0, OptionType::Call)
    ///     .unwrap();
    /// assert!((iv.0 - 0.2).abs() < 1e-13);
    /// ```
    pub fn compute(
        option_price: f64,
        forward: f64,
        strike: f64,
        expiry: f64,
        option_type: OptionType,
    ) -> crate::error::Result<Vol> {
        let mut price = validate_non_negative(option_price, "option_price")?;
        let f = validate_positive(forward, "forward")?;
        let k = validate_positive(strike, "strike")?;
        let t = validate_positive(expiry, "expiry")?;

        let mut q = option_type.sign();

        let intrinsic = (if q < 0.0 { k - f } else { f - k }).max(0.0).abs();
        if price < intrinsic {
            return Err(VolError::BelowIntrinsic);
        }
        let max_price = if q < 0.0 { k } else { f };
        if price >= max_price {
            return Err(VolError::AboveMaximum);
        }

        let x = (f / k).ln();

        // Subtract the intrinsic part of in-the-money prices here, in price
        // units, so the normalized engine only ever sees out-of-the-money
        // time value.
        if q * x > 0.0 {
            price = (price - intrinsic).max(0.0).abs();
            q = -q;
        }

        let beta = price / (f.sqrt() * k.sqrt());
        let (s, _) = unchecked_normalized_implied_vol(
            beta,
            x,
            q,
            IMPLIED_VOLATILITY_MAX_ITERATIONS,
        )?;
        Ok(Vol(s / t.sqrt()))
    }
}

/// Compute normalized implied volatility s = σ·√T from a normalized price.
///
/// # Arguments
/// * `beta` — Normalized price: price/√(F·K) (must be ≥ 0)
/// * `x` — Log-moneyness ln(F/K)
/// * `option_type` — Call or Put
///
/// # Errors
/// [`VolError::BelowIntrinsic`] and [`VolError::AboveMaximum`] under the
/// same price-bound semantics as [`BlackImpliedVol::compute`];
/// [`VolError::InvalidInput`] for NaN or infinite arguments.
pub fn normalized_implied_black_vol(
    beta: f64,
    x: f64,
    option_type: OptionType,
) -> crate::error::Result<f64> {
    let mut beta = validate_non_negative(beta, "beta")?;
    let x = validate_finite(x, "x")?;
    let mut q = option_type.sign();

    if q * x > 0.0 {
        beta -= crate::black::normalized_intrinsic(x, q);
        q = -q;
    }
    if beta < 0.0 {
        return Err(VolError::BelowIntrinsic);
    }

    let (s, _) =
        unchecked_normalized_implied_vol(beta, x, q, IMPLIED_VOLATILITY_MAX_ITERATIONS)?;
    Ok(s)
}

/// Compute the undiscounted Black option price.
///
/// # Arguments
/// * `forward` — Forward price at expiry (must be > 0)
/// * `strike` — Strike price (must be > 0)
/// * `vol` — Black volatility σ (must be ≥ 0)
/// * `expiry` — Time to expiry in years (must be ≥ 0)
/// * `option_type` — Call or Put
///
/// Put prices are obtained from the call kernel through the reflection
/// b_put(x, s) = b_call(−x, s).
///
/// # Errors
/// Returns [`VolError::InvalidInput`] for invalid inputs.
pub fn black_price(
    forward: f64,
    strike: f64,
    vol: f64,
    expiry: f64,
    option_type: OptionType,
) -> crate::error::Result<f64> {
    let f = validate_positive(forward, "forward")?;
    let k = validate_positive(strike, "strike")?;
    let sigma = validate_non_negative(vol, "volatility")?;
    let t = validate_non_negative(expiry, "expiry")?;

    let x = (f / k).ln();
    let s = sigma * t.sqrt();
    let x_eff = match option_type {
        OptionType::Call => x,
        OptionType::Put => -x,
    };
    Ok(f.sqrt() * k.sqrt() * normalized_black_call(x_eff, s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn black_price_put_call_parity() {
        let (f, k, sigma, t) = (100.0, 110.0, 0.25, 1.0);
        let call = black_price(f, k, sigma, t, OptionType::Call).unwrap();
        let put = black_price(f, k, sigma, t, OptionType::Put).unwrap();
        assert_abs_diff_eq!(call - put, f - k, epsilon = 1e-12);
    }

    #[test]
    fn black_price_zero_vol_is_intrinsic() {
        assert_abs_diff_eq!(
            black_price(100.0, 80.0, 0.0, 1.0, OptionType::Call).unwrap(),
            20.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            black_price(100.0, 120.0, 0.0, 1.0, OptionType::Call).unwrap(),
            0.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            black_price(100.0, 120.0, 0.0, 1.0, OptionType::Put).unwrap(),
            20.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn black_price_zero_expiry_is_intrinsic() {
        assert_abs_diff_eq!(
            black_price(100.0, 80.0, 0.2, 0.0, OptionType::Call).unwrap(),
            20.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn black_price_atm_closed_form() {
        // ATM: C = √(FK)·erf(σ√T/(2√2)).
        let (f, k, sigma, t) = (100.0, 100.0, 0.2, 1.0);
        let price = black_price(f, k, sigma, t, OptionType::Call).unwrap();
        assert_abs_diff_eq!(price, 7.965567455405798, epsilon = 1e-12);
    }

    #[test]
    fn black_price_rejects_bad_inputs() {
        assert!(black_price(-1.0, 100.0, 0.2, 1.0, OptionType::Call).is_err());
        assert!(black_price(100.0, 0.0, 0.2, 1.0, OptionType::Call).is_err());
        assert!(black_price(100.0, 100.0, -0.2, 1.0, OptionType::Call).is_err());
        assert!(black_price(100.0, 100.0, 0.2, f64::NAN, OptionType::Call).is_err());
    }

    #[test]
    fn compute_rejects_bad_inputs() {
        let c = |p, f, k, t| BlackImpliedVol::compute(p, f, k, t, OptionType::Call);
        assert!(matches!(
            c(-1.0, 100.0, 100.0, 1.0),
            Err(VolError::InvalidInput { .. })
        ));
        assert!(matches!(
            c(5.0, f64::NAN, 100.0, 1.0),
            Err(VolError::InvalidInput { .. })
        ));
        assert!(matches!(
            c(5.0, 100.0, -100.0, 1.0),
            Err(VolError::InvalidInput { .. })
        ));
        assert!(matches!(
            c(5.0, 100.0, 100.0, 0.0),
            Err(VolError::InvalidInput { .. })
        ));
    }

    #[test]
    fn compute_rejects_price_below_intrinsic() {
        // F=110, K=100 call: intrinsic 10, price 5.
        let err = BlackImpliedVol::compute(5.0, 110.0, 100.0, 1.0, OptionType::Call).unwrap_err();
        assert_eq!(err, VolError::BelowIntrinsic);
    }

    #[test]
    fn compute_rejects_price_above_maximum() {
        // Call price capped by the forward.
        let err = BlackImpliedVol::compute(105.0, 100.0, 100.0, 1.0, OptionType::Call).unwrap_err();
        assert_eq!(err, VolError::AboveMaximum);
        // Put price capped by the strike.
        let err = BlackImpliedVol::compute(100.0, 100.0, 90.0, 1.0, OptionType::Put).unwrap_err();
        assert_eq!(err, VolError::AboveMaximum);
    }

    #[test]
    fn compute_price_at_intrinsic_is_zero_vol() {
        let iv = BlackImpliedVol::compute(10.0, 110.0, 100.0, 1.0, OptionType::Call).unwrap();
        assert_abs_diff_eq!(iv.0, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn compute_zero_price_otm_is_zero_vol() {
        let iv = BlackImpliedVol::compute(0.0, 90.0, 100.0, 1.0, OptionType::Call).unwrap();
        assert_abs_diff_eq!(iv.0, 0.0, epsilon = 0.0);
    }

    #[test]
    fn round_trip_atm_call() {
        let (f, k, t, sigma) = (100.0, 100.0, 1.0, 0.2);
        let price = black_price(f, k, sigma, t, OptionType::Call).unwrap();
        let iv = BlackImpliedVol::compute(price, f, k, t, OptionType::Call).unwrap();
        assert_abs_diff_eq!(iv.0, sigma, epsilon = 1e-13);
    }

    #[test]
    fn round_trip_otm_put() {
        let (f, k, t, sigma) = (110.0, 100.0, 2.0, 0.3);
        let price = black_price(f, k, sigma, t, OptionType::Put).unwrap();
        let iv = BlackImpliedVol::compute(price, f, k, t, OptionType::Put).unwrap();
        assert_abs_diff_eq!(iv.0, sigma, epsilon = 1e-13);
    }

    #[test]
    fn round_trip_short_and_long_expiry() {
        for &(t, sigma) in &[(0.01, 0.2), (10.0, 0.2), (1.0, 0.01), (1.0, 2.0)] {
            let price = black_price(100.0, 100.0, sigma, t, OptionType::Call).unwrap();
            let iv = BlackImpliedVol::compute(price, 100.0, 100.0, t, OptionType::Call).unwrap();
            assert_abs_diff_eq!(iv.0, sigma, epsilon = 1e-12);
        }
    }

    #[test]
    fn normalized_entry_point_matches_price_level_entry() {
        let (f, k, t, sigma) = (90.0f64, 100.0f64, 2.0f64, 0.3f64);
        let price = black_price(f, k, sigma, t, OptionType::Call).unwrap();
        let beta = price / (f.sqrt() * k.sqrt());
        let x = (f / k).ln();
        let s = normalized_implied_black_vol(beta, x, OptionType::Call).unwrap();
        let iv = BlackImpliedVol::compute(price, f, k, t, OptionType::Call).unwrap();
        assert_abs_diff_eq!(s / t.sqrt(), iv.0, epsilon = 1e-15);
    }

    #[test]
    fn normalized_entry_point_rejects_below_intrinsic() {
        // ITM call with β smaller than the normalized intrinsic value.
        let x = 0.5f64;
        let intrinsic = (0.5 * x).exp() - (-0.5 * x).exp();
        let err = normalized_implied_black_vol(0.5 * intrinsic, x, OptionType::Call).unwrap_err();
        assert_eq!(err, VolError::BelowIntrinsic);
    }
}
