//! Node sensitivities of the quintic spline checked against independent
//! bump-and-rebuild estimates.

use approx::assert_abs_diff_eq;
use qn_core::Real;
use qn_math::interpolations::{
    CubicSplineInterpolator, MonotonicityPreservingQuinticSplineInterpolator,
    NaturalSplineInterpolator, PiecewisePolynomialInterpolator, PiecewisePolynomialInterpolator1D,
    SemiLocalCubicSplineInterpolator,
};

const EPS: Real = 1e-7;

fn knots() -> Vec<Real> {
    (1..=10).map(|i| i as Real).collect()
}

fn datasets() -> Vec<Vec<Real>> {
    let xs = knots();
    vec![
        xs.iter()
            .map(|&x| 0.5 * x * x * x - 1.5 * x * x + x - 2.0)
            .collect(),
        xs.iter().map(|&x| (0.1 * x - 6.0).exp()).collect(),
        xs.iter()
            .map(|&x| (3.0 * x + 1.0) / (x * x + 1.0))
            .collect(),
        vec![4.0, 3.0, 2.0, 1.0, 0.1, 0.1, 1.0, 2.0, 3.0, 4.0],
    ]
}

fn queries() -> Vec<Real> {
    (0..20).map(|k| 1.05 + 0.45 * k as Real).collect()
}

/// Centred difference of the rebuilt spline at `x` for node `j`.
fn bumped<M: PiecewisePolynomialInterpolator>(
    method: &M,
    xs: &[Real],
    ys: &[Real],
    j: usize,
    x: Real,
) -> Real {
    let value = |y: Real| {
        let mut ys = ys.to_vec();
        ys[j] = y;
        method.interpolate(xs, &ys).unwrap().evaluate(x).unwrap()[0]
    };
    let y = ys[j];
    if y == 0.0 {
        0.5 * (value(EPS) - value(-EPS)) / EPS
    } else {
        0.5 * (value(y * (1.0 + EPS)) - value(y * (1.0 - EPS))) / EPS / y
    }
}

fn check<M: PiecewisePolynomialInterpolator + Clone>(method: M) {
    let xs = knots();
    let wrapper = PiecewisePolynomialInterpolator1D::new(method.clone());
    for ys in datasets() {
        let bundle = wrapper.data_bundle(&xs, &ys).unwrap();
        for x in queries() {
            let sense = wrapper.node_sensitivities_for_value(&bundle, x).unwrap();
            assert_eq!(sense.len(), xs.len());
            for (j, &s) in sense.iter().enumerate() {
                let expected = bumped(&method, &xs, &ys, j, x);
                let tolerance = (ys[j].abs() * EPS).max(EPS) * 10.0;
                assert!(
                    (s - expected).abs() <= tolerance,
                    "{method:?} node {j} at x={x}: {s} vs {expected}"
                );
            }
        }
    }
}

#[test]
fn natural_seed_matches_finite_differences() {
    check(MonotonicityPreservingQuinticSplineInterpolator::new(
        NaturalSplineInterpolator,
    ));
}

#[test]
fn not_a_knot_seed_matches_finite_differences() {
    check(MonotonicityPreservingQuinticSplineInterpolator::new(
        CubicSplineInterpolator,
    ));
}

#[test]
fn akima_seed_matches_finite_differences() {
    check(MonotonicityPreservingQuinticSplineInterpolator::new(
        SemiLocalCubicSplineInterpolator,
    ));
}

#[test]
fn sensitivity_at_interior_knots_picks_that_node() {
    let xs = knots();
    let wrapper = PiecewisePolynomialInterpolator1D::new(
        MonotonicityPreservingQuinticSplineInterpolator::new(SemiLocalCubicSplineInterpolator),
    );
    for ys in datasets() {
        let bundle = wrapper.data_bundle(&xs, &ys).unwrap();
        for k in 0..9 {
            let sense = wrapper
                .node_sensitivities_for_value(&bundle, xs[k])
                .unwrap();
            for (j, &s) in sense.iter().enumerate() {
                let expected = if j == k { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(s, expected, epsilon = 1e-6);
            }
        }
    }
}

#[test]
fn sensitivities_of_a_shifted_series_sum_to_one() {
    let xs = knots();
    let ys = [4.0, 3.0, 2.0, 1.0, 0.1, 0.1, 1.0, 2.0, 3.0, 4.0];
    let wrapper = PiecewisePolynomialInterpolator1D::new(
        MonotonicityPreservingQuinticSplineInterpolator::new(CubicSplineInterpolator),
    );
    let bundle = wrapper.data_bundle(&xs, &ys).unwrap();
    let sense = wrapper.node_sensitivities_for_value(&bundle, 5.5).unwrap();
    assert_abs_diff_eq!(sense.iter().sum::<Real>(), 1.0, epsilon = 1e-6);
}

#[test]
fn sensitivities_reject_non_finite_queries() {
    let wrapper = PiecewisePolynomialInterpolator1D::new(
        MonotonicityPreservingQuinticSplineInterpolator::new(CubicSplineInterpolator),
    );
    let bundle = wrapper.data_bundle(&knots(), &datasets()[0]).unwrap();
    assert!(wrapper
        .node_sensitivities_for_value(&bundle, f64::INFINITY)
        .is_err());
}
