//! End-to-end tests for the trend smoother: fit shape, interval coherence,
//! degenerate-value substitution, and the documented edge-case scenarios.

use nalgebra::Cholesky;

use drt_common::{Error, Observation};
use drt_core::config::SmootherConfig;
use drt_core::smoother::{
    design_point, fit_group, predict, smooth_cohort, DesignPoint, DEGENERATE_LOGIT_MEAN,
    DEGENERATE_LOGIT_SPREAD,
};

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

const PRIOR: [f64; 3] = [1.0, 1.0, 100.0];

fn seeded_config(seed: u64) -> SmootherConfig {
    SmootherConfig::default().with_seed(seed)
}

/// Five observations at years 2000..2008 step 2, bounds at +/- a half-width.
fn survey_series(half_width: f64) -> Vec<Observation> {
    let estimates = [2.0, 2.5, 3.0, 2.8, 3.2];
    estimates
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            Observation::new(2000 + 2 * i as i32, p, p - half_width, p + half_width)
        })
        .collect()
}

fn design_points(observations: &[Observation]) -> Vec<DesignPoint> {
    observations
        .iter()
        .map(|obs| design_point(obs, 2000).unwrap())
        .collect()
}

#[test]
fn fit_returns_symmetric_positive_definite_covariance() {
    let points = design_points(&survey_series(0.5));
    let posterior = fit_group(&points, &PRIOR).unwrap();

    for i in 0..3 {
        for j in 0..3 {
            let diff = (posterior.covariance[(i, j)] - posterior.covariance[(j, i)]).abs();
            assert!(diff <= 1e-12, "covariance not symmetric at ({i},{j})");
        }
    }
    assert!(
        Cholesky::new(posterior.covariance).is_some(),
        "covariance must be positive definite"
    );
}

#[test]
fn predicted_intervals_are_coherent() {
    let years: Vec<i32> = (2000..=2012).collect();
    let series = smooth_cohort(&survey_series(0.5), &years, &seeded_config(7)).unwrap();

    assert_eq!(series.len(), years.len());
    for p in series.iter() {
        assert!(
            p.lower <= p.mean && p.mean <= p.upper,
            "incoherent interval at year {}: ({}, {}, {})",
            p.year,
            p.lower,
            p.mean,
            p.upper
        );
    }
}

#[test]
fn logistic_output_stays_within_percentage_scale() {
    let years: Vec<i32> = (1995..=2020).collect();
    let series = smooth_cohort(&survey_series(0.5), &years, &seeded_config(13)).unwrap();

    for p in series.iter() {
        assert!(p.lower >= 0.0, "lower bound below 0 at year {}", p.year);
        assert!(p.upper <= 100.0, "upper bound above 100 at year {}", p.year);
    }
}

#[test]
fn degenerate_point_estimate_substitutes_fixed_fallback() {
    // 100% point estimate: the fallback applies regardless of bounds.
    let obs = Observation::new(2003, 100.0, 97.0, 100.0);
    let point = design_point(&obs, 2000).unwrap();
    assert_eq!(point.logit_mean, DEGENERATE_LOGIT_MEAN);
    assert_eq!(point.logit_spread, DEGENERATE_LOGIT_SPREAD);
    assert_eq!(point.logit_mean, -6.0);
    assert_eq!(point.logit_spread, 1.0);
}

#[test]
fn two_distinct_time_points_raise_insufficient_data() {
    let observations = vec![
        Observation::new(2015, 10.0, 8.0, 12.0),
        Observation::new(2016, 11.0, 9.0, 13.0),
    ];
    let points = design_points(&observations);
    let err = fit_group(&points, &PRIOR).unwrap_err();
    assert!(matches!(err, Error::InsufficientData { distinct_years: 2 }));
}

#[test]
fn looser_bounds_never_tighten_credible_intervals() {
    let years: Vec<i32> = (2000..=2010).collect();
    let config = seeded_config(99);

    let narrow = smooth_cohort(&survey_series(0.5), &years, &config).unwrap();
    let wide = smooth_cohort(&survey_series(1.5), &years, &config).unwrap();

    let avg_width = |series: &drt_common::SmoothedSeries| {
        series.iter().map(|p| p.upper - p.lower).sum::<f64>() / series.len() as f64
    };
    assert!(
        avg_width(&wide) >= avg_width(&narrow),
        "wider observation intervals produced a tighter credible band"
    );
}

#[test]
fn scenario_five_point_series_predicts_plausible_2010_level() {
    let series = smooth_cohort(
        &survey_series(0.5),
        &(2000..=2010).collect::<Vec<i32>>(),
        &seeded_config(2024),
    )
    .unwrap();

    let at_2010 = series.get(2010).expect("2010 must be predicted");
    assert!(
        at_2010.mean >= 2.0 && at_2010.mean <= 4.0,
        "2010 mean {} outside [2, 4]",
        at_2010.mean
    );
    assert!(at_2010.lower < at_2010.mean && at_2010.mean < at_2010.upper);
}

#[test]
fn scenario_zero_point_estimate_smooths_without_domain_error() {
    // A 0% observation must go through the fallback rather than producing a
    // non-finite logit.
    let observations = vec![
        Observation::new(2000, 0.0, 0.0, 0.1),
        Observation::new(2002, 0.5, 0.2, 0.8),
        Observation::new(2004, 0.8, 0.4, 1.2),
    ];
    let series = smooth_cohort(
        &observations,
        &(2000..=2004).collect::<Vec<i32>>(),
        &seeded_config(5),
    )
    .unwrap();

    for p in series.iter() {
        assert!(p.mean.is_finite() && p.lower.is_finite() && p.upper.is_finite());
        assert!(p.lower >= 0.0 && p.upper <= 100.0);
    }
}

#[test]
fn scenario_two_distinct_years_fails_end_to_end() {
    let observations = vec![
        Observation::new(2015, 10.0, 8.0, 12.0),
        Observation::new(2016, 11.0, 9.0, 13.0),
    ];
    let err = smooth_cohort(&observations, &[2015, 2016, 2017], &seeded_config(6)).unwrap_err();
    assert!(matches!(err, Error::InsufficientData { .. }));
}

#[test]
fn seeded_runs_are_bit_identical() {
    let years: Vec<i32> = (2000..=2008).collect();
    let config = seeded_config(31337);
    let a = smooth_cohort(&survey_series(0.5), &years, &config).unwrap();
    let b = smooth_cohort(&survey_series(0.5), &years, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn predict_tracks_the_fitted_posterior_mean() {
    // With tight flat data the smoothed mean at an observed year should sit
    // near the observed level.
    let observations: Vec<Observation> = (0..5)
        .map(|i| Observation::new(2000 + i, 2.0, 1.8, 2.2))
        .collect();
    let points = design_points(&observations);
    let posterior = fit_group(&points, &PRIOR).unwrap();

    let config = seeded_config(8);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(8);
    let series = predict(&posterior, &[2002], &config, &mut rng).unwrap();
    let p = &series.points[0];
    assert!(
        (p.mean - 2.0).abs() < 0.5,
        "smoothed mean {} far from observed level 2.0",
        p.mean
    );
}
