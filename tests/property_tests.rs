//! Property-based tests using proptest.
//!
//! These tests verify invariant properties across random inputs rather than
//! testing fixed examples. They help catch edge cases and ensure robustness.

use proptest::prelude::*;

use blackvol::{
    black_price, erf, normal, normalized_black_call, normalized_implied_black_vol, BlackImpliedVol,
    OptionType,
};

// --- Property 1: volatility recovery on the well-conditioned domain ---

proptest! {
    /// Pricing with a known σ and inverting the price must recover σ.
    ///
    /// The domain is restricted to moderate moneyness and volatility so the
    /// quote keeps enough time value for σ to be determined to full
    /// precision (wing behavior is covered by the integration tests).
    #[test]
    fn implied_vol_recovers_pricing_vol(
        x in -0.3_f64..0.3,
        sigma in 0.1_f64..1.5,
        expiry in 0.25_f64..2.0,
        is_call in any::<bool>(),
    ) {
        let forward = 100.0;
        let strike = forward / x.exp();
        let option_type = if is_call { OptionType::Call } else { OptionType::Put };

        // Keep enough time value on the in-the-money side for σ to stay
        // fully determined after the intrinsic subtraction.
        prop_assume!(x.abs() / (sigma * expiry.sqrt()) < 4.0);

        let price = black_price(forward, strike, sigma, expiry, option_type).unwrap();
        let iv = BlackImpliedVol::compute(price, forward, strike, expiry, option_type).unwrap();

        prop_assert!(
            (iv.0 - sigma).abs() < 1e-9,
            "recovered {} vs true {} at x={}, T={}",
            iv.0,
            sigma,
            x,
            expiry
        );
    }
}

// --- Property 2: price round trip everywhere representable ---

proptest! {
    /// price → σ → price must close to machine level even where σ itself
    /// is ill-determined, as long as the price has time value.
    #[test]
    fn price_round_trip_closes(
        x in -1.0_f64..1.0,
        sigma in 0.05_f64..3.0,
        expiry in 0.1_f64..4.0,
    ) {
        let forward = 100.0;
        let strike = forward / x.exp();
        let s = sigma * expiry.sqrt();
        // Skip quotes whose time value underflows entirely.
        prop_assume!(x.abs() / s < 12.0);

        let price = black_price(forward, strike, sigma, expiry, OptionType::Call).unwrap();
        let intrinsic = (forward - strike).max(0.0);
        prop_assume!(price > intrinsic);

        let iv = BlackImpliedVol::compute(price, forward, strike, expiry, OptionType::Call).unwrap();
        let reprice = black_price(forward, strike, iv.0, expiry, OptionType::Call).unwrap();

        prop_assert!(
            (price - reprice).abs() <= 1e-12 * price.max(1.0),
            "price {} vs reprice {} at x={}, sigma={}, T={}",
            price,
            reprice,
            x,
            sigma,
            expiry
        );
    }
}

// --- Property 3: put-call volatility consistency ---

proptest! {
    /// A call and the parity-equivalent put P = C − (F − K) imply the same
    /// volatility.
    #[test]
    fn put_call_parity_implies_same_vol(
        x in -0.25_f64..0.25,
        sigma in 0.1_f64..1.0,
    ) {
        let forward = 100.0;
        let strike = forward / x.exp();
        let expiry = 1.0;

        let call = black_price(forward, strike, sigma, expiry, OptionType::Call).unwrap();
        let put = call - (forward - strike);
        prop_assume!(put > 0.0);

        let iv_call = BlackImpliedVol::compute(call, forward, strike, expiry, OptionType::Call).unwrap();
        let iv_put = BlackImpliedVol::compute(put, forward, strike, expiry, OptionType::Put).unwrap();

        prop_assert!(
            (iv_call.0 - iv_put.0).abs() < 1e-10,
            "call vol {} vs put vol {}",
            iv_call.0,
            iv_put.0
        );
    }
}

// --- Property 4: monotonicity of the normalized inverse ---

proptest! {
    /// For fixed x, β ↦ s(β) is strictly increasing: a higher price always
    /// means a higher volatility.
    #[test]
    fn normalized_inverse_is_monotone(
        x in -1.0_f64..0.0,
        u1 in 0.02_f64..0.98,
        u2 in 0.02_f64..0.98,
    ) {
        prop_assume!((u1 - u2).abs() > 1e-6);
        let b_max = (0.5 * x).exp();
        let beta1 = u1 * b_max;
        let beta2 = u2 * b_max;

        let s1 = normalized_implied_black_vol(beta1, x, OptionType::Call).unwrap();
        let s2 = normalized_implied_black_vol(beta2, x, OptionType::Call).unwrap();

        prop_assert_eq!(beta1 < beta2, s1 < s2, "monotonicity violated at x={}", x);
    }
}

// --- Property 5: normalized kernel bounds ---

proptest! {
    /// 0 ≤ b(x, s) ≤ exp(x/2) for every (x, s).
    #[test]
    fn normalized_black_call_respects_bounds(
        x in -3.0_f64..3.0,
        s in 0.0_f64..10.0,
    ) {
        let b = normalized_black_call(x, s);
        prop_assert!(b >= 0.0);
        prop_assert!(b <= (0.5 * x).exp() * (1.0 + 1e-14));
    }
}

// --- Property 6: special-function symmetries ---

proptest! {
    /// erf is odd, bit-exactly; erfc reflects around 1.
    #[test]
    fn erf_symmetries(x in -30.0_f64..30.0) {
        prop_assert_eq!(erf::erf(-x), -erf::erf(x));
        prop_assert!((erf::erfc(x) + erf::erfc(-x) - 2.0).abs() < 1e-14);
    }
}

proptest! {
    /// Φ(x) + Φ(−x) = 1 and Φ is non-decreasing.
    #[test]
    fn normal_cdf_symmetry_and_monotonicity(
        x in -8.0_f64..8.0,
        dx in 0.0_f64..0.5,
    ) {
        prop_assert!((normal::cdf(x) + normal::cdf(-x) - 1.0).abs() < 1e-14);
        // Sub-ulp increments may round either way; allow one ulp of slack.
        prop_assert!(normal::cdf(x + dx) >= normal::cdf(x) - 2e-16);
    }
}

proptest! {
    /// Φ(Φ⁻¹(u)) = u across the open unit interval.
    #[test]
    fn normal_quantile_inverts_cdf(u in 1e-8_f64..1.0) {
        prop_assume!(u < 1.0 - 1e-8);
        let z = normal::inverse_cdf(u);
        prop_assert!((normal::cdf(z) - u).abs() < 1e-13);
    }
}
