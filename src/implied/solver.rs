//! The normalized implied volatility engine.
//!
//! Inverts β = b(x, s) for s given a normalized out-of-the-money call price
//! β and log-moneyness x. The inverse is approximated once by a four-branch
//! rational initial guess and then polished with at most two Householder(3)
//! steps; the fourth-order convergence of each step is what turns the
//! ~10⁻⁴-accurate guess into a full-precision root in two iterations.
//!
//! The branch layout follows the geometry of s ↦ b(x, s), which has a
//! single inflection point at σc = √(2|x|):
//!
//! ```text
//!   β ∈ [0, bL)      far lower   — invert through f_lower (Φ³ transform)
//!   β ∈ [bL, bc)     center-left — rational cubic on (bL,σL)→(bc,σc)
//!   β ∈ [bc, bH]     center-right— rational cubic on (bc,σc)→(bH,σH)
//!   β ∈ (bH, b_max)  far upper   — invert through f_upper (Φ transform)
//! ```
//!
//! Each branch yields a [`Guess`]: the start iterate, the enclosing
//! bracket, and which of the three objective functions the polish loop
//! should drive to zero. The loop tightens the bracket from every sample,
//! counts direction reversals, and falls back to bisection whenever the
//! iterate escapes or oscillates; underflow of b or vega inside the
//! logarithmic objectives triggers the same bisection rescue.
//!
//! Reference: P. Jäckel, "Let's Be Rational" (2013).

use crate::black::{normalized_black_call, normalized_intrinsic, normalized_vega};
use crate::constants::{
    DENORMALIZATION_CUTOFF, PI_OVER_SIX, SQRT_DBL_MAX, SQRT_ONE_OVER_THREE, SQRT_PI_OVER_TWO,
    SQRT_THREE, TWO_PI, TWO_PI_OVER_SQRT_TWENTY_SEVEN,
};
use crate::error::VolError;
use crate::normal::{cdf, inverse_cdf, pdf};
use crate::rational_cubic::{
    convex_rational_cubic_control_parameter_to_fit_second_derivative_at_left_side,
    convex_rational_cubic_control_parameter_to_fit_second_derivative_at_right_side,
    rational_cubic_interpolation,
};

fn square(x: f64) -> f64 {
    x * x
}

fn is_below_horizon(x: f64) -> bool {
    x.abs() < DENORMALIZATION_CUTOFF
}

/// Objective function driven to zero by the Householder loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Objective {
    /// g(s) = 1/ln b(s) − 1/ln β. Tames the extreme gradient decay of b at
    /// very low prices.
    ReciprocalLog,
    /// g(s) = b(s) − β. The plain objective for the central branches.
    Difference,
    /// g(s) = ln((b_max − β)/(b_max − b(s))). Resolves prices within
    /// rounding distance of the upper bound.
    LogComplement,
}

/// Output of an initial-guess branch: start iterate, enclosing bracket, and
/// the objective the polish loop should use.
#[derive(Clone, Copy, Debug)]
struct Guess {
    s: f64,
    s_left: f64,
    s_right: f64,
    objective: Objective,
}

/// f_lower(x, s) = (2π·|x|/√27)·Φ(−|x|/(√3·s))³ and its first two
/// derivatives with respect to β.
fn f_lower_map_and_derivatives(x: f64, s: f64) -> (f64, f64, f64) {
    let ax = x.abs();
    let z = SQRT_ONE_OVER_THREE * ax / s;
    let y = z * z;
    let s2 = s * s;
    let phi_minus = cdf(-z);
    let phi_density = pdf(z);

    let fpp = PI_OVER_SIX * y / (s2 * s)
        * phi_minus
        * (8.0 * SQRT_THREE * s * ax + (3.0 * s2 * (s2 - 8.0) - 8.0 * x * x) * phi_minus / phi_density)
        * (2.0 * y + 0.25 * s2).exp();

    let (f, fp);
    if is_below_horizon(s) {
        fp = 1.0;
        f = 0.0;
    } else {
        let phi2 = phi_minus * phi_minus;
        fp = TWO_PI * y * phi2 * (y + 0.125 * s * s).exp();
        f = if is_below_horizon(x) {
            0.0
        } else {
            TWO_PI_OVER_SQRT_TWENTY_SEVEN * ax * (phi2 * phi_minus)
        };
    }

    (f, fp, fpp)
}

fn inverse_f_lower_map(x: f64, f: f64) -> f64 {
    if is_below_horizon(f) {
        return 0.0;
    }
    (x / (SQRT_THREE
        * inverse_cdf((f / (TWO_PI_OVER_SQRT_TWENTY_SEVEN * x.abs())).cbrt())))
    .abs()
}

/// f_upper(s) = Φ(−s/2) and its first two derivatives with respect to β.
fn f_upper_map_and_derivatives(x: f64, s: f64) -> (f64, f64, f64) {
    let f = cdf(-0.5 * s);
    let (fp, fpp);
    if is_below_horizon(x) {
        fp = -0.5;
        fpp = 0.0;
    } else {
        let w = square(x / s);
        fp = -0.5 * (0.5 * w).exp();
        fpp = SQRT_PI_OVER_TWO * (w + 0.125 * s * s).exp() * w / s;
    }
    (f, fp, fpp)
}

fn inverse_f_upper_map(f: f64) -> f64 {
    -2.0 * inverse_cdf(f)
}

/// Householder(3) correction factor applied to the Newton step.
fn householder_factor(newton: f64, halley: f64, hh3: f64) -> f64 {
    (1.0 + 0.5 * halley * newton) / (1.0 + newton * (halley + hh3 * newton / 6.0))
}

/// Build the initial guess for an out-of-the-money call with x ≤ 0 and
/// β ∈ (0, b_max).
fn initial_guess(beta: f64, x: f64, b_max: f64) -> Guess {
    // Inflection point of s ↦ b(x, s).
    let s_c = (2.0 * x.abs()).sqrt();
    let b_c = normalized_black_call(x, s_c);
    let v_c = normalized_vega(x, s_c);

    if beta < b_c {
        // Lower half: anchor at the tangent from the inflection point down
        // to the s-axis.
        let s_l = (s_c - b_c / v_c).max(0.0);
        let b_l = normalized_black_call(x, s_l);

        if beta < b_l {
            // Far-lower branch: interpolate β ↦ f_lower, then invert the
            // Φ³ transform.
            let (f_lower_l, d_f_lower_l, d2_f_lower_l) = f_lower_map_and_derivatives(x, s_l);
            let r_ll =
                convex_rational_cubic_control_parameter_to_fit_second_derivative_at_right_side(
                    0.0, b_l, 0.0, f_lower_l, 1.0, d_f_lower_l, d2_f_lower_l, true,
                );
            let mut f =
                rational_cubic_interpolation(beta, 0.0, b_l, 0.0, f_lower_l, 1.0, d_f_lower_l, r_ll);
            if !(f > 0.0) {
                // The rational cubic collapsed; a quadratic through the same
                // nodes keeps the guess usable.
                let t = beta / b_l;
                f = (f_lower_l * t + b_l * (1.0 - t)) * t;
            }
            Guess {
                s: inverse_f_lower_map(x, f),
                s_left: f64::MIN_POSITIVE,
                s_right: s_l,
                objective: Objective::ReciprocalLog,
            }
        } else {
            // Center-left branch.
            let v_l = normalized_vega(x, s_l);
            let r_lm =
                convex_rational_cubic_control_parameter_to_fit_second_derivative_at_right_side(
                    b_l,
                    b_c,
                    s_l,
                    s_c,
                    1.0 / v_l,
                    1.0 / v_c,
                    0.0,
                    false,
                );
            Guess {
                s: rational_cubic_interpolation(
                    beta,
                    b_l,
                    b_c,
                    s_l,
                    s_c,
                    1.0 / v_l,
                    1.0 / v_c,
                    r_lm,
                ),
                s_left: s_l,
                s_right: s_c,
                objective: Objective::Difference,
            }
        }
    } else {
        // Upper half: anchor at the tangent from the inflection point up to
        // the price cap b_max.
        let s_h = if v_c > f64::MIN_POSITIVE {
            s_c + (b_max - b_c) / v_c
        } else {
            s_c
        };
        let b_h = normalized_black_call(x, s_h);

        if beta <= b_h {
            // Center-right branch.
            let v_h = normalized_vega(x, s_h);
            let r_hm =
                convex_rational_cubic_control_parameter_to_fit_second_derivative_at_left_side(
                    b_c,
                    b_h,
                    s_c,
                    s_h,
                    1.0 / v_c,
                    1.0 / v_h,
                    0.0,
                    false,
                );
            Guess {
                s: rational_cubic_interpolation(
                    beta,
                    b_c,
                    b_h,
                    s_c,
                    s_h,
                    1.0 / v_c,
                    1.0 / v_h,
                    r_hm,
                ),
                s_left: s_c,
                s_right: s_h,
                objective: Objective::Difference,
            }
        } else {
            // Far-upper branch: interpolate β ↦ f_upper = Φ(−s/2), then
            // invert.
            let (f_upper_h, d_f_upper_h, d2_f_upper_h) = f_upper_map_and_derivatives(x, s_h);
            let mut f = 0.0;
            if d2_f_upper_h > -SQRT_DBL_MAX && d2_f_upper_h < SQRT_DBL_MAX {
                let r_hh =
                    convex_rational_cubic_control_parameter_to_fit_second_derivative_at_left_side(
                        b_h,
                        b_max,
                        f_upper_h,
                        0.0,
                        d_f_upper_h,
                        -0.5,
                        d2_f_upper_h,
                        true,
                    );
                f = rational_cubic_interpolation(
                    beta,
                    b_h,
                    b_max,
                    f_upper_h,
                    0.0,
                    d_f_upper_h,
                    -0.5,
                    r_hh,
                );
            }
            if f <= 0.0 {
                let h = b_max - b_h;
                let t = (beta - b_h) / h;
                f = (f_upper_h * (1.0 - t) + 0.5 * h * t) * (1.0 - t);
            }
            Guess {
                s: inverse_f_upper_map(f),
                s_left: s_h,
                s_right: f64::MAX,
                // Within rounding distance of b_max the plain difference
                // objective cannot resolve the root.
                objective: if beta > 0.5 * b_max {
                    Objective::LogComplement
                } else {
                    Objective::Difference
                },
            }
        }
    }
}

/// Invert β = b(x, s) for an arbitrary (β, x, q), performing the
/// out-of-the-money reduction first. Returns (s, householder_steps).
///
/// The step count is surfaced so tests can pin the bounded-iteration
/// guarantee; public wrappers discard it.
pub(crate) fn unchecked_normalized_implied_vol(
    mut beta: f64,
    mut x: f64,
    mut q: f64,
    max_iter: usize,
) -> Result<(f64, usize), VolError> {
    // Map in-the-money options to out-of-the-money by subtracting the
    // intrinsic value, then puts to calls by reflection.
    if q * x > 0.0 {
        beta = (beta - normalized_intrinsic(x, q)).max(0.0).abs();
        q = -q;
    }
    if q < 0.0 {
        x = -x;
    }

    if beta <= 0.0 || beta < DENORMALIZATION_CUTOFF {
        return Ok((0.0, 0));
    }

    let b_max = (0.5 * x).exp();
    if beta >= b_max {
        return Err(VolError::AboveMaximum);
    }

    let guess = initial_guess(beta, x, b_max);

    let mut s = guess.s;
    let mut s_left = guess.s_left;
    let mut s_right = guess.s_right;
    let mut ds = s; // forces entry into the polish loop
    let mut ds_previous = 0.0;
    let mut direction_reversal_count = 0;
    let mut iterations = 0;

    while iterations < max_iter && ds.abs() > f64::EPSILON * s {
        if ds * ds_previous < 0.0 {
            direction_reversal_count += 1;
        }
        if iterations > 0 && (direction_reversal_count == 3 || !(s > s_left && s < s_right)) {
            // Oscillation or bracket escape: restart from the midpoint.
            s = 0.5 * (s_left + s_right);
            if s_right - s_left <= f64::EPSILON * s {
                break;
            }
            direction_reversal_count = 0;
            ds = 0.0;
        }

        ds_previous = ds;
        let b = normalized_black_call(x, s);
        let v = normalized_vega(x, s);

        // Every sample tightens the bracket around the root.
        if b > beta && s < s_right {
            s_right = s;
        } else if b < beta && s > s_left {
            s_left = s;
        }

        ds = match guess.objective {
            Objective::ReciprocalLog => {
                if b <= 0.0 || v <= 0.0 {
                    // b underflowed at an extreme low price.
                    0.5 * (s_left + s_right) - s
                } else {
                    let ln_b = b.ln();
                    let ln_beta = beta.ln();
                    let bpob = v / b;
                    let h = x / s;
                    let b_halley = h * h / s - s / 4.0;
                    let newton = (ln_beta - ln_b) * ln_b / ln_beta / bpob;
                    let halley = b_halley - bpob * (1.0 + 2.0 / ln_b);
                    let b_hh3 = b_halley * b_halley - 3.0 * square(h / s) - 0.25;
                    let hh3 = b_hh3
                        + 2.0 * square(bpob) * (1.0 + 3.0 / ln_b * (1.0 + 1.0 / ln_b))
                        - 3.0 * b_halley * bpob * (1.0 + 2.0 / ln_b);
                    newton * householder_factor(newton, halley, hh3)
                }
            }
            Objective::Difference => {
                let newton = (beta - b) / v;
                let halley = square(x / s) / s - s / 4.0;
                let hh3 = halley * halley - 3.0 * square(x / (s * s)) - 0.25;
                newton * householder_factor(newton, halley, hh3)
            }
            Objective::LogComplement => {
                if b >= b_max || v <= f64::MIN_POSITIVE {
                    // b collided with the cap or vega underflowed.
                    0.5 * (s_left + s_right) - s
                } else {
                    let b_max_minus_b = b_max - b;
                    let g = ((b_max - beta) / b_max_minus_b).ln();
                    let gp = v / b_max_minus_b;
                    let b_halley = square(x / s) / s - s / 4.0;
                    let b_hh3 = b_halley * b_halley - 3.0 * square(x / (s * s)) - 0.25;
                    let newton = -g / gp;
                    let halley = b_halley + gp;
                    let hh3 = b_hh3 + gp * (2.0 * gp + 3.0 * b_halley);
                    newton * householder_factor(newton, halley, hh3)
                }
            }
        };

        // Never step below half the current iterate.
        ds = ds.max(-0.5 * s);
        s += ds;
        iterations += 1;
    }

    Ok((s, iterations))
}
