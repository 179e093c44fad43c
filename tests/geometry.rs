use approx::assert_abs_diff_eq;
use probsim::geometry::presets;
use probsim::geometry::{
    Disk, NestedRegions, Point, Region, SamplerError, Square, Triangle,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use std::f64::consts::PI;

fn rng(seed: u64) -> Xoshiro256Plus {
    Xoshiro256Plus::seed_from_u64(seed)
}

fn shoelace(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    ((b.0 - a.0) * (c.1 - a.1) - (c.0 - a.0) * (b.1 - a.1)).abs() / 2.0
}

#[test]
fn right_triangle_membership() {
    let tri = Triangle::new(
        Point::new(0.0, 0.0),
        Point::new(4.0, 0.0),
        Point::new(0.0, 4.0),
    )
    .unwrap();

    assert!(tri.contains(&Point::new(1.0, 1.0)));
    assert!(!tri.contains(&Point::new(3.0, 3.0)));
    assert!(tri.contains(&Point::new(2.0, 2.0)));
}

#[test]
fn inscribed_circle_in_square() {
    let square = Square::new(Point::new(0.0, 0.0), 10.0).unwrap();
    let circle = Disk::new(Point::new(5.0, 5.0), 5.0).unwrap();
    let regions =
        NestedRegions::new(square, vec![Region::new("circle", circle)], "rest")
            .unwrap();

    let experiment = regions.run(50_000, &mut rng(2024)).unwrap();
    let circle = &experiment.regions()[0];

    assert_abs_diff_eq!(circle.theoretical, PI / 4.0, epsilon = 1E-12);
    assert_abs_diff_eq!(circle.empirical, 0.7854, epsilon = 0.01);
}

#[test]
fn target_probabilities_sum_to_one() {
    let regions =
        presets::target(presets::TARGET_SIDE, &presets::TARGET_RADII).unwrap();
    let ps = regions.theoretical();

    assert_eq!(ps.len(), 4);
    assert_abs_diff_eq!(ps.iter().sum::<f64>(), 1.0, epsilon = 1E-9);
    assert_abs_diff_eq!(ps[0], 0.09 * PI / 4.0, epsilon = 1E-12);
    assert_abs_diff_eq!(ps[3], 1.0 - PI / 4.0, epsilon = 1E-12);
}

#[test]
fn target_converges_at_large_n() {
    let regions =
        presets::target(presets::TARGET_SIDE, &presets::TARGET_RADII).unwrap();
    let experiment = regions.run(100_000, &mut rng(17)).unwrap();

    assert_eq!(experiment.n(), 100_000);
    assert!(experiment.max_abs_diff() < 0.01);
}

#[test]
fn inscribed_preset_layout() {
    let regions = presets::inscribed(presets::INSCRIBED_SIDE).unwrap();
    let ps = regions.theoretical();

    // incircle r = 2.5, triangle side 5√3
    let circle = 25.0 * PI;
    let triangle = 3.0_f64.sqrt() / 4.0 * 75.0;
    let incircle = 6.25 * PI;

    assert_abs_diff_eq!(ps[0], incircle / 100.0, epsilon = 1E-10);
    assert_abs_diff_eq!(ps[1], (triangle - incircle) / 100.0, epsilon = 1E-10);
    assert_abs_diff_eq!(ps[2], (circle - triangle) / 100.0, epsilon = 1E-10);
    assert_abs_diff_eq!(ps[3], 1.0 - circle / 100.0, epsilon = 1E-10);

    let experiment = regions
        .run(presets::INSCRIBED_SAMPLES, &mut rng(5))
        .unwrap();
    let hits: usize = experiment.regions().iter().map(|r| r.hits).sum();
    assert_eq!(hits, presets::INSCRIBED_SAMPLES);
}

#[test]
fn zero_samples_is_an_error() {
    let regions = presets::inscribed(10.0).unwrap();
    assert_eq!(
        regions.run(0, &mut rng(1)).unwrap_err(),
        SamplerError::NoSamples
    );
    assert_eq!(regions.observe(&[]).unwrap_err(), SamplerError::NoSamples);
}

#[test]
fn report_lists_every_region() {
    let regions = presets::inscribed(10.0).unwrap();
    let report = regions.run(500, &mut rng(3)).unwrap().to_string();

    for label in regions.labels() {
        assert!(report.contains(label));
    }
    assert!(report.ends_with("N = 500"));
}

proptest! {
    #[test]
    fn theoretical_sums_to_one(
        side in 0.5_f64..100.0,
        fracs in prop::collection::vec(0.01_f64..1.0, 1..6),
    ) {
        let mut radii: Vec<f64> =
            fracs.iter().map(|f| f * side / 2.0).collect();
        radii.sort_by(|a, b| a.partial_cmp(b).unwrap());
        radii.dedup();

        let regions = presets::target(side, &radii).unwrap();
        let total: f64 = regions.theoretical().iter().sum();
        prop_assert!((total - 1.0).abs() < 1E-9);
    }

    #[test]
    fn hits_sum_to_n(n in 1_usize..2_000, seed in any::<u64>()) {
        let regions = presets::inscribed(10.0).unwrap();
        let experiment = regions.run(n, &mut rng(seed)).unwrap();

        let hits: usize = experiment.regions().iter().map(|r| r.hits).sum();
        let freq: f64 = experiment.regions().iter().map(|r| r.empirical).sum();
        prop_assert_eq!(hits, n);
        prop_assert!((freq - 1.0).abs() < 1E-9);
    }

    #[test]
    fn barycentric_agrees_with_area_split(
        ax in -10.0_f64..10.0, ay in -10.0_f64..10.0,
        bx in -10.0_f64..10.0, by in -10.0_f64..10.0,
        cx in -10.0_f64..10.0, cy in -10.0_f64..10.0,
        px in -12.0_f64..12.0, py in -12.0_f64..12.0,
    ) {
        let (a, b, c, p) = ((ax, ay), (bx, by), (cx, cy), (px, py));
        let area = shoelace(a, b, c);
        prop_assume!(area > 1E-2);

        let tri = Triangle::new(a.into(), b.into(), c.into()).unwrap();
        let point = Point::from(p);

        // keep clear of the edges, where rounding decides
        let (u, v) = tri.barycentric(&point);
        prop_assume!(u.abs() > 1E-6 && v.abs() > 1E-6);
        prop_assume!((1.0 - u - v).abs() > 1E-6);

        let split = shoelace(p, b, c) + shoelace(a, p, c) + shoelace(a, b, p);
        let inside = (split - area).abs() <= 1E-9 * area.max(1.0);
        prop_assert_eq!(tri.contains(&point), inside);
    }
}
