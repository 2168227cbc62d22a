//! Error functions erf, erfc, and erfcx.
//!
//! Rational Chebyshev approximations after W. J. Cody, "Rational Chebyshev
//! approximations for the error function" (Math. Comp. 23, 1969, pp.
//! 631–638). One private kernel evaluates a region-dependent approximation
//! of |x| and the three public functions recover their values through the
//! algebraic identities
//!
//! ```text
//! erfc(x)  = 1 − erf(x)
//! erfcx(x) = exp(x²)·erfc(x)
//! ```
//!
//! Three regions: |x| ≤ 15/32 (direct erf), 15/32 < |x| ≤ 4 (erfc with a
//! split-exponent evaluation of exp(−x²)), and |x| > 4 (asymptotic form).
//! Relative accuracy is at the 10⁻¹⁶ level except for erfcx at very large
//! arguments, where the tail collapses to 1/(x√π).

/// Largest negative argument for erfcx before 2·exp(x²) overflows.
const XNEG: f64 = -26.628;
/// Below this, erf(x) is x·2/√π to machine precision.
const XSMALL: f64 = 1.11e-16;
/// Largest argument for which erfc is representable.
const XBIG: f64 = 26.543;
/// Above this, 1/(2x²) underflows in the asymptotic correction.
const XHUGE: f64 = 6.71e7;
/// Largest acceptable argument for erfcx.
const XMAX: f64 = 2.53e307;

/// 1/√π.
const SQRPI: f64 = 0.56418958354775628695;
/// Region-1/2 boundary, 15/32.
const THRESHOLD: f64 = 0.46875;

// Region 1 (|x| <= 15/32): erf(x) = x·P(x²)/Q(x²).
const A: [f64; 5] = [
    3.16112374387056560,
    113.864154151050156,
    377.485237685302021,
    3209.37758913846947,
    0.185777706184603153,
];
const B: [f64; 4] = [
    23.6012909523441209,
    244.024637934444173,
    1282.61652607737228,
    2844.23683343917062,
];

// Region 2 (15/32 < |x| <= 4): erfc(x) = exp(−x²)·C(|x|)/D(|x|).
const C: [f64; 9] = [
    0.564188496988670089,
    8.88314979438837594,
    66.1191906371416295,
    298.635138197400131,
    881.95222124176909,
    1712.04761263407058,
    2051.07837782607147,
    1230.33935479799725,
    2.15311535474403846e-8,
];
const D: [f64; 8] = [
    15.7449261107098347,
    117.693950891312499,
    537.181101862009858,
    1621.38957456669019,
    3290.79923573345963,
    4362.61909014324716,
    3439.36767414372164,
    1230.33935480374942,
];

// Region 3 (|x| > 4): erfc(x)·x·exp(x²) = 1/√π − y·P(y)/Q(y), y = 1/x².
const P: [f64; 6] = [
    0.305326634961232344,
    0.360344899949804439,
    0.125781726111229246,
    0.0160837851487422766,
    6.58749161529837803e-4,
    0.0163153871373020978,
];
const Q: [f64; 5] = [
    2.56852019228982242,
    1.87295284992346047,
    0.527905102951428412,
    0.0605183413124413191,
    0.00233520497626869185,
];

#[derive(Clone, Copy, PartialEq, Eq)]
enum ErfKind {
    Erf,
    Erfc,
    Erfcx,
}

/// Split-exponent evaluation of exp(−y²) for y ≥ 0.
///
/// Writes y² = y0² + δ with y0 = ⌊16y⌋/16, so exp(−y0²) is exact in its
/// argument and δ = (y − y0)(y + y0) carries the remainder without
/// cancellation.
fn exp_minus_y_squared(y: f64) -> f64 {
    let y0 = (y * 16.0).floor() / 16.0;
    let del = (y - y0) * (y + y0);
    (-y0 * y0).exp() * (-del).exp()
}

/// Shared kernel for erf / erfc / erfcx.
fn calerf(x: f64, kind: ErfKind) -> f64 {
    let y = x.abs();

    // Region 1: |x| <= 15/32. Compute erf directly.
    if y <= THRESHOLD {
        let ysq = if y > XSMALL { y * y } else { 0.0 };

        let mut xnum = A[4] * ysq;
        let mut xden = ysq;
        for i in 0..3 {
            xnum = (xnum + A[i]) * ysq;
            xden = (xden + B[i]) * ysq;
        }
        let mut result = x * (xnum + A[3]) / (xden + B[3]);

        if kind != ErfKind::Erf {
            result = 1.0 - result;
        }
        if kind == ErfKind::Erfcx {
            result *= ysq.exp();
        }
        return result;
    }

    // Regions 2 and 3 compute erfc(|x|) (scaled for erfcx); erf and the
    // negative-argument identities are recovered below.
    let mut result;

    if y <= 4.0 {
        // Region 2: rational approximation in |x|.
        let mut xnum = C[8] * y;
        let mut xden = y;
        for i in 0..7 {
            xnum = (xnum + C[i]) * y;
            xden = (xden + D[i]) * y;
        }
        result = (xnum + C[7]) / (xden + D[7]);

        if kind != ErfKind::Erfcx {
            result *= exp_minus_y_squared(y);
        }
    } else if y >= XBIG {
        // Tail underflow edges: erfc rounds to 0 from XBIG on; erfcx keeps
        // its leading term 1/(y√π) until XMAX.
        if kind != ErfKind::Erfcx || y >= XMAX {
            result = 0.0;
        } else {
            result = SQRPI / y;
        }
    } else {
        // Region 3: asymptotic form in 1/x².
        if y < XHUGE {
            let ysq = 1.0 / (y * y);
            let mut xnum = P[5] * ysq;
            let mut xden = ysq;
            for i in 0..4 {
                xnum = (xnum + P[i]) * ysq;
                xden = (xden + Q[i]) * ysq;
            }
            result = ysq * (xnum + P[4]) / (xden + Q[4]);
            result = (SQRPI - result) / y;
        } else {
            // 1/(2x²) underflows; the leading asymptotic term remains.
            result = SQRPI / y;
        }

        if kind != ErfKind::Erfcx {
            result *= exp_minus_y_squared(y);
        }
    }

    match kind {
        ErfKind::Erf => {
            result = 1.0 - result;
            if x < 0.0 {
                -result
            } else {
                result
            }
        }
        ErfKind::Erfc => {
            if x < 0.0 {
                2.0 - result
            } else {
                result
            }
        }
        ErfKind::Erfcx => {
            if x < 0.0 {
                if x < XNEG {
                    f64::INFINITY
                } else {
                    // 2·exp(x²) via the same split-exponent scheme.
                    let y0 = (x * 16.0).floor() / 16.0;
                    let del = (x - y0) * (x + y0);
                    let e = (y0 * y0).exp() * del.exp();
                    (e + e) - result
                }
            } else {
                result
            }
        }
    }
}

/// Error function: erf(x) = (2/√π)·∫₀ˣ exp(−t²) dt.
pub fn erf(x: f64) -> f64 {
    calerf(x, ErfKind::Erf)
}

/// Complementary error function: erfc(x) = 1 − erf(x).
pub fn erfc(x: f64) -> f64 {
    calerf(x, ErfKind::Erfc)
}

/// Scaled complementary error function: erfcx(x) = exp(x²)·erfc(x).
///
/// Stays representable far beyond the point where erfc underflows, which is
/// what makes the cancellation-free Black-call formulations possible.
pub fn erfcx(x: f64) -> f64 {
    calerf(x, ErfKind::Erfcx)
}
