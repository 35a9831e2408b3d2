//! Integration tests for the monotonicity-preserving quintic spline.
//!
//! Every scenario runs against the three reference seeds: the natural cubic
//! spline, the not-a-knot cubic spline and the semi-local (Akima) spline.

use approx::assert_abs_diff_eq;
use qn_core::{Error, Real};
use qn_math::interpolations::{
    CubicSplineInterpolator, LocalCubicInterpolator, LocalCubicScheme,
    MonotonicityPreservingQuinticSplineInterpolator, NaturalSplineInterpolator,
    PiecewisePolynomialInterpolator, PiecewisePolynomialResult, SemiLocalCubicSplineInterpolator,
};

fn knots() -> Vec<Real> {
    (1..=10).map(|i| i as Real).collect()
}

/// Ten samples per interval over `[1, 10]`.
fn oversampled() -> Vec<Real> {
    (0..=90).map(|k| 1.0 + k as Real / 10.0).collect()
}

fn quintic<S: PiecewisePolynomialInterpolator>(
    seed: S,
    xs: &[Real],
    ys: &[Real],
) -> PiecewisePolynomialResult {
    MonotonicityPreservingQuinticSplineInterpolator::new(seed)
        .interpolate(xs, ys)
        .unwrap()
}

/// Run `check` once per reference seed.
fn for_each_seed(xs: &[Real], ys: &[Real], check: impl Fn(&str, PiecewisePolynomialResult)) {
    check("natural", quintic(NaturalSplineInterpolator, xs, ys));
    check("not-a-knot", quintic(CubicSplineInterpolator, xs, ys));
    check("akima", quintic(SemiLocalCubicSplineInterpolator, xs, ys));
}

/// Value, first and second derivative of the left piece at its right end.
fn left_limits(pp: &PiecewisePolynomialResult, knot: usize) -> (Real, Real, Real) {
    let h = pp.knots()[knot] - pp.knots()[knot - 1];
    let c = pp.piece(knot - 1, 0);
    let value = c.iter().fold(0.0, |acc, &k| acc * h + k);
    let first = c[..5]
        .iter()
        .enumerate()
        .fold(0.0, |acc, (j, &k)| acc * h + (5 - j) as Real * k);
    let second = c[..4].iter().enumerate().fold(0.0, |acc, (j, &k)| {
        acc * h + ((5 - j) * (4 - j)) as Real * k
    });
    (value, first, second)
}

// ─── Reproduction ─────────────────────────────────────────────────────────────

#[test]
fn cubic_data_is_interpolated_at_every_knot() {
    let f = |x: Real| 0.5 * x * x * x - 1.5 * x * x + x - 2.0;
    let xs = knots();
    let ys: Vec<Real> = xs.iter().map(|&x| f(x)).collect();
    for_each_seed(&xs, &ys, |seed, pp| {
        assert_eq!(pp.order(), 6);
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            let v = pp.evaluate(x).unwrap()[0];
            assert!(
                (v - y).abs() <= 1e-10 * y.abs().max(1.0),
                "{seed} at x={x}: expected {y}, got {v}"
            );
        }
        let values = pp.evaluate_keys(&oversampled()).unwrap();
        assert!(
            values.iter().all(|v| v.is_finite()),
            "{seed}: non-finite value"
        );
    });
}

#[test]
fn not_a_knot_seed_recovers_a_monotone_cubic() {
    let xs = knots();
    let ys: Vec<Real> = xs.iter().map(|&x| x * x * x).collect();
    let pp = quintic(CubicSplineInterpolator, &xs, &ys);
    for x in oversampled() {
        assert_abs_diff_eq!(pp.evaluate(x).unwrap()[0], x * x * x, epsilon = 1e-10);
    }
}

#[test]
fn exact_seeds_recover_monotone_quadratics() {
    let xs = knots();
    let quadratics: [fn(Real) -> Real; 2] = [|x| x * x + x, |x| 1.0 - 2.0 * x * x];
    for f in quadratics {
        let ys: Vec<Real> = xs.iter().map(|&x| f(x)).collect();
        let nak = quintic(CubicSplineInterpolator, &xs, &ys);
        let akima = quintic(SemiLocalCubicSplineInterpolator, &xs, &ys);
        for x in oversampled() {
            assert_abs_diff_eq!(nak.evaluate(x).unwrap()[0], f(x), epsilon = 1e-10);
            assert_abs_diff_eq!(akima.evaluate(x).unwrap()[0], f(x), epsilon = 1e-10);
        }
    }
}

#[test]
fn linear_data_is_recovered_with_every_seed() {
    let xs = knots();
    let ys: Vec<Real> = xs.iter().map(|&x| 3.0 - 0.5 * x).collect();
    for_each_seed(&xs, &ys, |seed, pp| {
        for x in oversampled() {
            let v = pp.evaluate(x).unwrap()[0];
            assert!(
                (v - (3.0 - 0.5 * x)).abs() < 1e-10,
                "{seed} at x={x}: got {v}"
            );
        }
    });
}

#[test]
fn constant_data_stays_constant() {
    let xs = knots();
    let ys = vec![2.5; 10];
    for_each_seed(&xs, &ys, |seed, pp| {
        for x in oversampled() {
            assert_eq!(pp.evaluate(x).unwrap()[0], 2.5, "{seed} at x={x}");
        }
        let d = pp.differentiate(&oversampled()).unwrap();
        assert!(d.iter().all(|&v| v == 0.0), "{seed}: non-zero slope");
    });
}

// ─── Shape ────────────────────────────────────────────────────────────────────

#[test]
fn valley_has_no_spurious_extrema() {
    let xs = knots();
    let ys = [4.0, 3.0, 2.0, 1.0, 0.1, 0.1, 1.0, 2.0, 3.0, 4.0];
    for_each_seed(&xs, &ys, |seed, pp| {
        for i in 0..9 {
            let samples: Vec<Real> = (0..=200)
                .map(|k| pp.evaluate(xs[i] + k as Real / 200.0).unwrap()[0])
                .collect();
            let rising = ys[i + 1] - ys[i];
            for w in samples.windows(2) {
                if rising > 0.0 {
                    assert!(w[1] >= w[0] - 1e-12, "{seed}: dip on interval {i}");
                } else if rising < 0.0 {
                    assert!(w[1] <= w[0] + 1e-12, "{seed}: bump on interval {i}");
                } else {
                    assert_abs_diff_eq!(w[1], ys[i], epsilon = 1e-12);
                }
            }
        }
    });
}

#[test]
fn result_is_twice_continuously_differentiable() {
    let xs = knots();
    let ys = [4.0, 3.0, 2.0, 1.0, 0.1, 0.1, 1.0, 2.0, 3.0, 4.0];
    for_each_seed(&xs, &ys, |seed, pp| {
        for k in 1..9 {
            let (v, d1, d2) = left_limits(&pp, k);
            let right = pp.piece(k, 0);
            assert!((v - right[5]).abs() < 1e-12, "{seed}: value jump at {k}");
            assert!((d1 - right[4]).abs() < 1e-11, "{seed}: slope jump at {k}");
            assert!(
                (d2 - 2.0 * right[3]).abs() < 1e-10,
                "{seed}: curvature jump at {k}"
            );
        }
    });
}

#[test]
fn non_monotone_data_is_handled() {
    let xs = knots();
    let ys = [1.0, 0.01, 0.5, 5.0, 0.1, 0.2, 0.5, 3.0, 2.0, 2.0];
    for_each_seed(&xs, &ys, |seed, pp| {
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            assert!(
                (pp.evaluate(x).unwrap()[0] - y).abs() < 1e-12,
                "{seed} at {x}"
            );
        }
        assert!(pp.coefficients().iter().all(|c| c.is_finite()));
        // flat last interval
        for k in 0..=10 {
            let v = pp.evaluate(9.0 + k as Real / 10.0).unwrap()[0];
            assert!((v - 2.0).abs() < 1e-12, "{seed}: last interval not flat");
        }
    });
}

#[test]
fn construction_is_deterministic() {
    let xs = knots();
    let ys = [1.0, 0.01, 0.5, 5.0, 0.1, 0.2, 0.5, 3.0, 2.0, 2.0];
    let interp = MonotonicityPreservingQuinticSplineInterpolator::new(CubicSplineInterpolator);
    let first = interp.interpolate(&xs, &ys).unwrap();
    let second = interp.interpolate(&xs, &ys).unwrap();
    assert_eq!(first, second);
}

#[test]
fn input_order_does_not_matter() {
    let xs = knots();
    let ys: Vec<Real> = xs.iter().map(|&x| (0.3 * x).exp()).collect();
    let mut shuffled: Vec<(Real, Real)> = xs.iter().copied().zip(ys.iter().copied()).collect();
    shuffled.swap(0, 7);
    shuffled.swap(3, 9);
    shuffled.reverse();
    let (sx, sy): (Vec<Real>, Vec<Real>) = shuffled.into_iter().unzip();

    let interp = MonotonicityPreservingQuinticSplineInterpolator::new(NaturalSplineInterpolator);
    assert_eq!(
        interp.interpolate(&xs, &ys).unwrap(),
        interp.interpolate(&sx, &sy).unwrap()
    );
}

// ─── Seeds ────────────────────────────────────────────────────────────────────

#[test]
fn clamped_seed_uses_boundary_derivatives() {
    let xs = knots();
    let mut ys = vec![2.0];
    ys.extend(xs.iter().map(|&x| x * x));
    ys.push(20.0);
    let pp = quintic(CubicSplineInterpolator, &xs, &ys);
    assert_eq!(pp.interval_count(), 9);
    for x in oversampled() {
        assert_abs_diff_eq!(pp.evaluate(x).unwrap()[0], x * x, epsilon = 1e-10);
    }
}

#[test]
fn seeds_without_boundary_support_reject_extra_values() {
    let xs = knots();
    let ys = vec![1.0; 12];
    let interp = MonotonicityPreservingQuinticSplineInterpolator::new(NaturalSplineInterpolator);
    assert!(matches!(
        interp.interpolate(&xs, &ys),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn local_cubic_seeds_are_accepted() {
    let xs = knots();
    let ys: Vec<Real> = xs.iter().map(|&x| x.ln()).collect();
    for scheme in [
        LocalCubicScheme::Parabolic,
        LocalCubicScheme::FritschButland,
        LocalCubicScheme::Kruger,
    ] {
        let pp = quintic(LocalCubicInterpolator::new(scheme), &xs, &ys);
        let values = pp.evaluate_keys(&oversampled()).unwrap();
        for w in values.as_slice().windows(2) {
            assert!(w[1] >= w[0] - 1e-12, "{scheme:?}: not increasing");
        }
    }
}

// ─── Multi-series ─────────────────────────────────────────────────────────────

#[test]
fn rows_match_individual_series() {
    let xs = knots();
    let rows = vec![
        xs.iter().map(|&x| x.sqrt()).collect::<Vec<_>>(),
        vec![4.0, 3.0, 2.0, 1.0, 0.1, 0.1, 1.0, 2.0, 3.0, 4.0],
        xs.iter().map(|&x| -x * x).collect::<Vec<_>>(),
    ];
    let interp =
        MonotonicityPreservingQuinticSplineInterpolator::new(SemiLocalCubicSplineInterpolator);
    let stacked = interp.interpolate_rows(&xs, &rows).unwrap();
    assert_eq!(stacked.dimensions(), 3);
    assert_eq!(stacked.coefficients().nrows(), 27);
    assert_eq!(stacked.coefficients().ncols(), 6);

    for (d, row) in rows.iter().enumerate() {
        let single = interp.interpolate(&xs, row).unwrap();
        for i in 0..9 {
            assert_eq!(stacked.piece(i, d), single.piece(i, 0));
        }
        assert_eq!(
            stacked.evaluate(4.4).unwrap()[d],
            single.evaluate(4.4).unwrap()[0]
        );
    }
}

#[test]
fn one_bad_series_fails_the_batch() {
    let xs = knots();
    let rows = vec![vec![1.0; 10], {
        let mut r = vec![1.0; 10];
        r[4] = f64::NAN;
        r
    }];
    let interp = MonotonicityPreservingQuinticSplineInterpolator::new(CubicSplineInterpolator);
    assert!(matches!(
        interp.interpolate_rows(&xs, &rows),
        Err(Error::InvalidInput(_))
    ));
}

// ─── Validation ───────────────────────────────────────────────────────────────

#[test]
fn invalid_input_is_rejected() {
    let interp = MonotonicityPreservingQuinticSplineInterpolator::new(CubicSplineInterpolator);
    let cases: [(&[Real], &[Real]); 6] = [
        (&[1.0, 2.0], &[1.0, 2.0]),
        (&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0, 4.0]),
        (&[1.0, 2.0, 2.0, 3.0], &[1.0, 2.0, 3.0, 4.0]),
        (&[1.0, f64::NAN, 3.0], &[1.0, 2.0, 3.0]),
        (&[1.0, 2.0, f64::INFINITY], &[1.0, 2.0, 3.0]),
        (&[1.0, 2.0, 3.0], &[1.0, f64::NEG_INFINITY, 3.0]),
    ];
    for (xs, ys) in cases {
        assert!(
            matches!(interp.interpolate(xs, ys), Err(Error::InvalidInput(_))),
            "accepted xs={xs:?} ys={ys:?}"
        );
    }
}

#[test]
fn overflowing_slopes_are_reported() {
    let interp =
        MonotonicityPreservingQuinticSplineInterpolator::new(SemiLocalCubicSplineInterpolator);
    let xs = [0.0, 1e-300, 2e-300, 3e-300];
    let ys = [0.0, 1e300, -1e300, 0.0];
    assert!(matches!(
        interp.interpolate(&xs, &ys),
        Err(Error::NumericalOverflow(_))
    ));
}
