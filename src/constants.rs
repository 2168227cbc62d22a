//! Mathematical and machine-precision constants for the inversion engine.
//!
//! The derived machine constants are exact powers of two written out as
//! literals (`f64::sqrt` is not available in const context). All values are
//! part of the cross-implementation ABI and must not be "simplified".

/// √DBL_EPSILON = 2⁻²⁶.
pub(crate) const SQRT_DBL_EPSILON: f64 = 1.490116119384765625e-8;

/// DBL_EPSILON^(1/4) = 2⁻¹³.
pub(crate) const FOURTH_ROOT_DBL_EPSILON: f64 = 1.220703125e-4;

/// DBL_EPSILON^(1/16) = 2⁻³·²⁵.
pub(crate) const SIXTEENTH_ROOT_DBL_EPSILON: f64 = 1.0511205190671431788e-1;

/// √DBL_MIN = 2⁻⁵¹¹.
pub(crate) const SQRT_DBL_MIN: f64 = 1.4916681462400413e-154;

/// √DBL_MAX.
pub(crate) const SQRT_DBL_MAX: f64 = 1.3407807929942596e154;

/// Below this magnitude a normalized price is treated as exactly zero.
/// Set to 0: full machine accuracy cannot be attained from denormalized
/// inputs anyway, so only true zeros short-circuit.
pub(crate) const DENORMALIZATION_CUTOFF: f64 = 0.0;

pub(crate) const ONE_OVER_SQRT_TWO: f64 = 0.7071067811865475244008443621048490392848359376887;
pub(crate) const ONE_OVER_SQRT_TWO_PI: f64 = 0.3989422804014326779399460599343818684758586311649;
pub(crate) const SQRT_TWO_PI: f64 = 2.506628274631000502415765284811045253006986740610;
pub(crate) const TWO_PI: f64 = 6.283185307179586476925286766559005768394338798750;
pub(crate) const SQRT_PI_OVER_TWO: f64 = 1.253314137315500251207882642405522626503493370305;
pub(crate) const SQRT_THREE: f64 = 1.732050807568877293527446341505872366942805253810;
pub(crate) const SQRT_ONE_OVER_THREE: f64 = 0.577350269189625764509148780501957455647601751270;
pub(crate) const TWO_PI_OVER_SQRT_TWENTY_SEVEN: f64 =
    1.209199576156145233729385505094770488189377498728;
pub(crate) const PI_OVER_SIX: f64 = 0.523598775598298873077107230546583814032861566563;

/// Householder steps per inversion. Two suffice for machine precision from
/// the rational initial guess.
pub(crate) const IMPLIED_VOLATILITY_MAX_ITERATIONS: usize = 2;

/// Regime-I selector: requires x < s·(−10), i.e. |h| > 10.
pub(crate) const ASYMPTOTIC_EXPANSION_ACCURACY_THRESHOLD: f64 = -10.0;

/// Regime-II selector: t = s/2 below 2·ε^(1/16) ≈ 0.21.
pub(crate) const SMALL_T_EXPANSION_THRESHOLD: f64 = 2.0 * SIXTEENTH_ROOT_DBL_EPSILON;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_machine_constants_are_exact_roots() {
        assert_eq!(SQRT_DBL_EPSILON * SQRT_DBL_EPSILON, f64::EPSILON);
        assert_eq!(
            FOURTH_ROOT_DBL_EPSILON * FOURTH_ROOT_DBL_EPSILON,
            SQRT_DBL_EPSILON
        );
        assert_eq!(SQRT_DBL_MIN * SQRT_DBL_MIN, f64::MIN_POSITIVE);
        // (ε^(1/16))⁴ = ε^(1/4).
        let sixteenth_sq = SIXTEENTH_ROOT_DBL_EPSILON * SIXTEENTH_ROOT_DBL_EPSILON;
        let sixteenth_pow4 = sixteenth_sq * sixteenth_sq;
        assert!((sixteenth_pow4 / FOURTH_ROOT_DBL_EPSILON - 1.0).abs() < 1e-15);
    }

    #[test]
    fn mathematical_constants_are_consistent() {
        let two_pi = 2.0 * std::f64::consts::PI;
        assert!((TWO_PI - two_pi).abs() < 1e-15);
        assert!((SQRT_TWO_PI * SQRT_TWO_PI - two_pi).abs() < 1e-15);
        assert!((ONE_OVER_SQRT_TWO_PI * SQRT_TWO_PI - 1.0).abs() < 1e-15);
        assert!((SQRT_THREE * SQRT_ONE_OVER_THREE - 1.0).abs() < 1e-15);
        assert!((TWO_PI_OVER_SQRT_TWENTY_SEVEN - two_pi / 27f64.sqrt()).abs() < 1e-15);
        assert!((PI_OVER_SIX - std::f64::consts::PI / 6.0).abs() < 1e-16);
        assert!((SQRT_PI_OVER_TWO - (std::f64::consts::PI / 2.0).sqrt()).abs() < 1e-15);
    }
}
