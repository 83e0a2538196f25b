//! End-to-end scenarios for the extension of set functions to integrable functions.

use std::sync::Arc;

use bochner::{
    integral, CauchySeq, ContinuousLinearMap, DiscreteMeasure, DominatedAdditive, ENNReal,
    ExtensionConfig, IntervalSet, L1Simple, Lebesgue, LipschitzIntegrand, MeasureSpace, Normed,
    PointFunction, PointSet, Scaled, SetToFun, SimpleFunction, L1,
};

fn set(points: &[usize]) -> PointSet {
    points.iter().copied().collect()
}

// =============================================================================
// Counting Measure
// =============================================================================

#[test]
fn test_constant_one_on_two_points() {
    let mu = Arc::new(DiscreteMeasure::counting(2));
    let t = DominatedAdditive::<_, f64, f64>::weighted_smul(mu.clone());
    let ext = SetToFun::new(t);

    let one = SimpleFunction::constant(mu.clone(), 1.0);
    assert_eq!(ext.set_to_fun(&one), 2.0);

    let pointwise = PointFunction::new(|_| 1.0);
    assert_eq!(ext.set_to_fun(&pointwise), 2.0);
}

#[test]
fn test_zero_function() {
    let mu = Arc::new(DiscreteMeasure::weighted(vec![1.0, f64::INFINITY]).unwrap());
    let ext = SetToFun::new(DominatedAdditive::<_, [f64; 3], [f64; 3]>::weighted_smul(mu.clone()));
    assert_eq!(ext.set_to_fun(&SimpleFunction::zero(mu)), [0.0; 3]);
}

// =============================================================================
// Null Sets
// =============================================================================

#[test]
fn test_values_on_null_set_are_ignored() {
    let mu = Arc::new(DiscreteMeasure::weighted(vec![0.0, 1.0]).unwrap());
    let ext = SetToFun::new(DominatedAdditive::<_, f64, f64>::weighted_smul(mu.clone()));

    for value in [1.0, -1e6, 42.0] {
        let f = SimpleFunction::indicator_const(mu.clone(), set(&[0]), value).unwrap();
        assert_eq!(ext.set_to_fun(&f), 0.0);
    }
}

#[test]
fn test_null_set_under_dirac_measure() {
    let mu = Arc::new(DiscreteMeasure::dirac(3, 1).unwrap());
    let f = PointFunction::from_values(vec![100.0, 2.5, -7.0]);
    assert_eq!(integral(&mu, &f), 2.5);
}

#[test]
fn test_null_interval_under_lebesgue() {
    let mu = Arc::new(Lebesgue);
    let f = SimpleFunction::indicator_const(mu.clone(), IntervalSet::interval(3.0, 3.0), 9.0)
        .unwrap();
    assert_eq!(integral(&mu, &f), 0.0);
}

// =============================================================================
// Continuity Along L¹-Convergent Sequences
// =============================================================================

#[test]
fn test_values_converge_along_l1_sequence() {
    let mu = Arc::new(Lebesgue);
    let ext = SetToFun::new(DominatedAdditive::<_, f64, f64>::weighted_smul(mu.clone()));

    // fₙ = 2 on [0, 1 + 1/n), converging in L¹ to 2 on [0, 1).
    let f_n = |n: u32| {
        let end = 1.0 + 1.0 / (n as f64 + 1.0);
        L1Simple::indicator_const(mu.clone(), IntervalSet::interval(0.0, end), 2.0).unwrap()
    };
    let limit = L1Simple::indicator_const(mu.clone(), IntervalSet::interval(0.0, 1.0), 2.0).unwrap();
    let target = ext.set_to_l1_simple(&limit);

    let mut previous = f64::INFINITY;
    for n in [1, 10, 100, 1000] {
        let gap = (ext.set_to_l1_simple(&f_n(n)) - target).norm();
        assert!(gap <= ext.bound() * f_n(n).dist(&limit) + 1e-12);
        assert!(gap < previous);
        previous = gap;
    }
}

#[test]
fn test_extension_at_limit_of_l1_sequence() {
    let mu = Arc::new(Lebesgue);
    let ext = SetToFun::new(DominatedAdditive::<_, f64, f64>::weighted_smul(mu.clone()));
    let m = mu.clone();

    // The class of 2 on [0, 1) given only through fₙ = 2 on [0, 1 + 1/(n+1)).
    let f = L1::from_approximations(
        move |n| {
            let end = 1.0 + 1.0 / (n as f64 + 1.0);
            L1Simple::indicator_const(m.clone(), IntervalSet::interval(0.0, end), 2.0).unwrap()
        },
        |n| 2.0 / (n as f64 + 1.0),
    );
    let approx = ext.set_to_l1_approx(&f);
    assert!(approx.depth.is_some());
    assert!((approx.value - 2.0).abs() <= approx.error_bound + 1e-12);
    assert!(approx.error_bound < 1e-3);
}

#[test]
fn test_limit_of_reindexed_sequence() {
    let mu = Arc::new(Lebesgue);
    let m = mu.clone();
    // fₖ = 1 on [0, 1 + 1/(k+1)), at L¹ distance 1/(k+1) from 1 on [0, 1).
    let f = L1::from_approximations(
        move |k| {
            let end = 1.0 + 1.0 / (k as f64 + 1.0);
            L1Simple::indicator_const(m.clone(), IntervalSet::interval(0.0, end), 1.0).unwrap()
        },
        |k| 1.0 / (k as f64 + 1.0),
    );
    let config = ExtensionConfig::default().with_tolerance(1e-3);
    let ext = SetToFun::with_config(DominatedAdditive::<_, f64, f64>::weighted_smul(mu), config)
        .unwrap();
    let approx = ext.set_to_l1_approx(&f);
    assert!(approx.depth.is_some());
    assert!((approx.value - 1.0).abs() <= approx.error_bound);
}

#[test]
fn test_embedded_and_limit_agree() {
    let mu = Arc::new(DiscreteMeasure::weighted(vec![0.5, 1.5]).unwrap());
    let ext = SetToFun::new(DominatedAdditive::<_, f64, f64>::weighted_smul(mu.clone()));
    let g = L1Simple::new(
        SimpleFunction::from_partition(mu.clone(), [(set(&[0]), 4.0), (set(&[1]), -2.0)]).unwrap(),
    )
    .unwrap();

    let embedded = L1::from_simple(g.clone());
    let g2 = g.clone();
    let as_limit = L1::from_cauchy(CauchySeq::new(move |_| g2.clone()));

    let exact = ext.set_to_l1_approx(&embedded);
    assert!(exact.is_exact());
    let approx = ext.set_to_l1_approx(&as_limit);
    assert!(!approx.is_exact());
    assert_eq!(exact.value, approx.value);
    assert_eq!(exact.value, -1.0);
}

// =============================================================================
// Lebesgue Integrals
// =============================================================================

#[test]
fn test_integral_of_linear_function() {
    let mu = Arc::new(Lebesgue);
    let f = LipschitzIntegrand::new(1.0, 3.0, 1.0, |x: f64| [x, 1.0]).unwrap();
    let ext = SetToFun::with_config(
        DominatedAdditive::<_, [f64; 2], [f64; 2]>::weighted_smul(mu),
        ExtensionConfig::coarse(),
    )
    .unwrap();
    let approx = ext.set_to_fun_approx(&f);
    // ∫₁³ x dx = 4, ∫₁³ 1 dx = 2
    assert!(approx.value.dist(&[4.0, 2.0]) <= approx.error_bound);
}

#[test]
fn test_set_function_with_vector_codomain() {
    let mu = Arc::new(Lebesgue);
    let m = mu.clone();
    // T(s)(x) = λ(s ∩ [0, ∞)) • (x, x): additive and dominated with C = √2.
    let positive = IntervalSet::interval(0.0, f64::INFINITY);
    let t = DominatedAdditive::new(mu.clone(), 2f64.sqrt(), move |s: &IntervalSet| {
        let w = m.measure(&s.inter(&positive)).to_real();
        ContinuousLinearMap::new(w * 2f64.sqrt(), move |x: &f64| [w * x, w * x])
    })
    .unwrap();
    let f = SimpleFunction::indicator_const(mu, IntervalSet::interval(-1.0, 2.0), 3.0).unwrap();
    assert_eq!(SetToFun::new(t).set_to_fun(&f), [6.0, 6.0]);
}

// =============================================================================
// Scaled Measures
// =============================================================================

#[test]
fn test_scaled_measure_scales_integral() {
    let base = DiscreteMeasure::weighted(vec![1.0, 2.0]).unwrap();
    let scaled = Arc::new(Scaled::new(base.clone(), ENNReal::new(3.0).unwrap()));
    let base = Arc::new(base);

    let f = SimpleFunction::from_partition(base.clone(), [(set(&[0]), 1.0), (set(&[1]), 5.0)])
        .unwrap();
    let g = SimpleFunction::from_partition(scaled.clone(), [(set(&[0]), 1.0), (set(&[1]), 5.0)])
        .unwrap();
    assert_eq!(integral(&scaled, &g), 3.0 * integral(&base, &f));
}
