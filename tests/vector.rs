//! Vector algebra: normalization laws, agreement of the selected kernel with
//! the f64 portable path, and the component-wise operations.

use lanemath::linalg::{vec3, vec4, Vec3, Vec4, Vector};
use lanemath::LaneError;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn widen<const N: usize>(v: Vector<f32, N>) -> Vector<f64, N> {
    Vector(v.0.map(f64::from))
}

fn relative_error(actual: f64, expected: f64) -> f64 {
    let scale = expected.abs().max(1.0);
    (actual - expected).abs() / scale
}

fn non_degenerate() -> impl Strategy<Value = [f32; 4]> {
    prop::array::uniform4(-1.0e3f32..1.0e3).prop_filter("non-zero length", |a| {
        a.iter().map(|x| x * x).sum::<f32>() > 1e-6
    })
}

proptest! {
    #[test]
    fn prop_normalize_has_unit_length(lanes in non_degenerate()) {
        let v = Vec4::from(lanes);
        let n = v.normalize();
        prop_assert!((n.length() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn prop_normalize_times_length_restores(lanes in non_degenerate()) {
        let v = Vec4::from(lanes);
        let restored = v.normalize() * v.length();
        prop_assert!((restored - v).length() <= 1e-3 * v.length());
    }

    #[test]
    fn prop_vec3_normalize(lanes in non_degenerate()) {
        let v = vec3(lanes[0], lanes[1], lanes[2]);
        prop_assume!(v.length_squared() > 1e-6);
        prop_assert!((v.normalize().length() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn prop_cross_is_orthogonal(a in prop::array::uniform3(-10.0f64..10.0), b in prop::array::uniform3(-10.0f64..10.0)) {
        let (a, b) = (Vec3::from(a), Vec3::from(b));
        let c = a.cross(b);
        prop_assert!(c.dot(a).abs() < 1e-9);
        prop_assert!(c.dot(b).abs() < 1e-9);
    }
}

#[test]
fn test_f32_kernel_agrees_with_f64() {
    let mut rng = StdRng::seed_from_u64(1234);
    for _ in 0..10_000 {
        let a: Vec4<f32> = Vector(std::array::from_fn(|_| rng.random_range(-100.0..100.0)));
        let b: Vec4<f32> = Vector(std::array::from_fn(|_| rng.random_range(-100.0..100.0)));
        let (da, db) = (widen(a), widen(b));

        let magnitude = (da * db).abs().sum();
        assert!((a.dot(b) as f64 - da.dot(db)).abs() <= 1e-6 * magnitude);
        assert!((a.sum() as f64 - da.sum()).abs() <= 1e-6 * da.abs().sum());
        assert_eq!(a.min_element() as f64, da.min_element());
        assert_eq!(a.max_element() as f64, da.max_element());
        assert_eq!(widen(a.min(b)), da.min(db));
        assert_eq!(widen(a.max(b)), da.max(db));
        assert_eq!(widen(a.abs()), da.abs());
        assert_eq!(a.sign_mask(), da.sign_mask());

        let (a3, b3) = (a.truncate(), b.truncate());
        let cross = widen(a3.cross(b3));
        let reference = widen(a3).cross(widen(b3));
        let scale = widen(a3).length() * widen(b3).length();
        assert!((cross - reference).length() <= 1e-6 * scale);
    }
}

#[test]
fn test_approximate_kernels() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..10_000 {
        let v: Vec4<f32> = Vector(std::array::from_fn(|_| rng.random_range(1e-3..1e3)));
        let rcp = v.rcp();
        let rsqrt = v.inverse_sqrt();
        let sqrt = v.sqrt();
        for i in 0..4 {
            let x = v[i] as f64;
            assert!((rcp[i] as f64 * x - 1.0).abs() < 1e-5);
            assert!((rsqrt[i] as f64 * x.sqrt() - 1.0).abs() < 1e-5);
            assert!(relative_error(sqrt[i] as f64, x.sqrt()) < 1e-6);
        }
    }
}

#[test]
fn test_exp_log_pow() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..10_000 {
        let x: Vec4<f32> = Vector(std::array::from_fn(|_| rng.random_range(-20.0..20.0)));
        let p: Vec4<f32> = Vector(std::array::from_fn(|_| rng.random_range(0.01..50.0)));
        let e = x.exp();
        let l = p.log();
        let pw = p.pow(Vector::splat(1.5));
        for i in 0..4 {
            let (xi, pi) = (x[i] as f64, p[i] as f64);
            assert!((e[i] as f64 / xi.exp() - 1.0).abs() < 1e-5, "exp({xi})");
            assert!((l[i] as f64 - pi.ln()).abs() < 1e-5 * pi.ln().abs().max(1.0), "ln({pi})");
            assert!((pw[i] as f64 / pi.powf(1.5) - 1.0).abs() < 1e-4, "pow({pi})");
        }
    }
}

#[test]
fn test_exp_log_special_values() {
    let e = vec4(0.0f32, 1.0, -200.0, f32::NAN).exp();
    assert_eq!(e[0], 1.0);
    assert!((e[1] - std::f32::consts::E).abs() < 1e-5);
    assert!(e[2] >= 0.0 && e[2] < 1e-37);
    assert!(e[3].is_nan());

    let l = vec4(1.0f32, 0.0, -1.0, f32::INFINITY).log();
    assert!(l[0].abs() < 1e-7);
    assert_eq!(l[1], f32::NEG_INFINITY);
    assert!(l[2].is_nan());
    assert_eq!(l[3], f32::INFINITY);
}

#[test]
fn test_recip_sum_and_boundaries() {
    let v = vec4(1.0f32, 2.0, 4.0, 1.0);
    assert!((v.recip_sum() - 0.125).abs() < 1e-7);

    let tiny = vec4(f32::MIN_POSITIVE / 4.0, 0.0, -0.0, f32::MAX);
    assert_eq!(tiny.max_element(), f32::MAX);
    assert_eq!(tiny.min_element(), 0.0);
    assert_eq!(tiny.abs(), vec4(f32::MIN_POSITIVE / 4.0, 0.0, 0.0, f32::MAX));
    assert_eq!(tiny.sign_mask(), 0b0100);
}

#[test]
fn test_wide_vectors_use_portable_path() {
    let v = Vector([1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    assert_eq!(v.sum(), 36.0);
    assert_eq!(v.dot(v), 204.0);
    assert_eq!(v.max_element(), 8.0);
    assert!((v.normalize().length() - 1.0).abs() < 1e-6);
}

#[test]
fn test_try_from_slice() {
    let data = [1.0f32, 2.0, 3.0, 4.0, 5.0];
    let v = Vec4::try_from(&data[..4]).expect("four lanes");
    assert_eq!(v, vec4(1.0, 2.0, 3.0, 4.0));
    assert_eq!(
        Vec3::<f32>::try_from(&data[..]),
        Err(LaneError::LengthMismatch { expected: 3, actual: 5 })
    );
}
