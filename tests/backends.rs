//! The selected kernel against the scalar reference over a randomized corpus
//! that mixes ordinary values with zeros, subnormals and large magnitudes.

use lanemath::simd::{self, shuffle_mask, F32x4, Float4Kernel, Lanes, Native, ScalarKernel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Values from every class the kernels must handle.
fn corpus_value(rng: &mut StdRng) -> f32 {
    match rng.random_range(0..8) {
        0 => 0.0,
        1 => -0.0,
        2 => f32::from_bits(rng.random_range(1..0x0080_0000)) * if rng.random() { 1.0 } else { -1.0 },
        3 => rng.random_range(-1.0e30f32..1.0e30),
        4 => f32::MIN_POSITIVE * rng.random_range(1.0f32..4.0),
        _ => rng.random_range(-1000.0f32..1000.0),
    }
}

fn corpus(seed: u64, count: usize) -> Vec<Lanes> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| std::array::from_fn(|_| corpus_value(&mut rng)))
        .collect()
}

fn lanewise(
    a: &Lanes,
    b: &Lanes,
    native: fn(<Native as Float4Kernel>::Reg, <Native as Float4Kernel>::Reg) -> <Native as Float4Kernel>::Reg,
    reference: fn(Lanes, Lanes) -> Lanes,
) -> (Lanes, Lanes) {
    (
        Native::store(native(Native::load(a), Native::load(b))),
        reference(*a, *b),
    )
}

#[test]
fn test_backend_report() {
    let selected = lanemath::backends();
    println!("{selected}");
    assert_eq!(selected.simd, simd::backend());
    assert_eq!(selected.simd, <Native as Float4Kernel>::NAME);
    assert_eq!(selected.half, lanemath::half::BACKEND);

    if cfg!(feature = "force-scalar") {
        assert_eq!(selected.simd, "scalar");
        assert_eq!(selected.half, "generic");
        assert_eq!(selected.popcount, "scalar");
    }
}

#[test]
fn test_exact_operations_agree() {
    let values = corpus(1, 20_000);
    for pair in values.chunks_exact(2) {
        let (a, b) = (&pair[0], &pair[1]);

        let cases = [
            lanewise(a, b, Native::add, |a, b| ScalarKernel::store(ScalarKernel::add(a, b))),
            lanewise(a, b, Native::sub, |a, b| ScalarKernel::store(ScalarKernel::sub(a, b))),
            lanewise(a, b, Native::mul, |a, b| ScalarKernel::store(ScalarKernel::mul(a, b))),
        ];
        for (fast, slow) in cases {
            assert_eq!(fast.map(f32::to_bits), slow.map(f32::to_bits), "{a:?} {b:?}");
        }

        // the sign of a zero picked by min/max is backend-defined
        let (fast, slow) = lanewise(a, b, Native::min, |a, b| ScalarKernel::store(ScalarKernel::min(a, b)));
        assert_eq!(fast, slow);
        let (fast, slow) = lanewise(a, b, Native::max, |a, b| ScalarKernel::store(ScalarKernel::max(a, b)));
        assert_eq!(fast, slow);

        let ra = Native::load(a);
        assert_eq!(Native::store(Native::abs(ra)), a.map(f32::abs));
        assert_eq!(Native::store(Native::neg(ra)).map(f32::to_bits), a.map(|x| (-x).to_bits()));
        assert_eq!(Native::store(Native::floor(ra)), a.map(f32::floor));
        assert_eq!(Native::store(Native::sqrt(Native::load(&a.map(f32::abs)))), a.map(|x| x.abs().sqrt()));
        assert_eq!(Native::sign_mask(ra), ScalarKernel::sign_mask(*a));
        assert_eq!(Native::hmin(ra), ScalarKernel::hmin(*a));
        assert_eq!(Native::hmax(ra), ScalarKernel::hmax(*a));
    }
}

#[test]
fn test_shuffles_agree() {
    let a = [1.0, 2.0, 3.0, 4.0];
    let b = [5.0, 6.0, 7.0, 8.0];
    let (ra, rb) = (Native::load(&a), Native::load(&b));

    const REVERSE: i32 = shuffle_mask(3, 2, 1, 0);
    const MIX: i32 = shuffle_mask(0, 2, 1, 3);
    assert_eq!(Native::store(Native::shuffle::<REVERSE>(ra, ra)), [4.0, 3.0, 2.0, 1.0]);
    assert_eq!(Native::store(Native::shuffle::<MIX>(ra, rb)), [1.0, 3.0, 6.0, 8.0]);
    assert_eq!(
        Native::store(Native::shuffle::<MIX>(ra, rb)),
        ScalarKernel::store(ScalarKernel::shuffle::<MIX>(a, b))
    );
}

#[test]
fn test_reductions_agree_on_ordinary_values() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..10_000 {
        let a: Lanes = std::array::from_fn(|_| rng.random_range(-1000.0..1000.0));
        let b: Lanes = std::array::from_fn(|_| rng.random_range(-1000.0..1000.0));
        let magnitude: f32 = a.iter().zip(&b).map(|(x, y)| (x * y).abs()).sum();

        assert!((Native::dot(&a, &b) - ScalarKernel::dot(&a, &b)).abs() <= 1e-6 * magnitude);
        assert!(
            (Native::sum(&a) - ScalarKernel::sum(&a)).abs()
                <= 1e-6 * a.iter().map(|x| x.abs()).sum::<f32>()
        );

        let (fast, slow) = (Native::normalize(&a), ScalarKernel::normalize(&a));
        for i in 0..4 {
            assert!((fast[i] - slow[i]).abs() < 1e-3);
        }
    }
}

#[test]
fn test_reciprocals_within_contract() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..10_000 {
        let x: Lanes = std::array::from_fn(|_| rng.random_range(1.0e-20f32..1.0e20));
        let r = Native::load(&x);
        let (rcp, rsqrt) = (Native::store(Native::rcp(r)), Native::store(Native::rsqrt(r)));
        for i in 0..4 {
            let xi = x[i] as f64;
            assert!((rcp[i] as f64 * xi - 1.0).abs() < 1e-5, "rcp({xi})");
            assert!((rsqrt[i] as f64 * xi.sqrt() - 1.0).abs() < 1e-5, "rsqrt({xi})");
        }
    }
}

/// Range ends of `exp` and the subnormal inputs of `log`.
fn boundary_lanes() -> Vec<Lanes> {
    let tiny = f32::from_bits(1);
    vec![
        [88.72, -88.72, 103.9, -103.9],
        [100.0, -100.0, 88.722_83, 88.722_84],
        [-103.972_08, -103.972_09, -88.0, -88.3],
        [89.0, 1000.0, -1000.0, f32::INFINITY],
        [tiny, -tiny, 1.0e-40, 5.0e-39],
        [f32::MIN_POSITIVE, f32::MAX, f32::NEG_INFINITY, 0.0],
    ]
}

fn assert_exp_agrees(x: &Lanes) {
    let fast = Native::store(Native::exp(Native::load(x)));
    let slow = ScalarKernel::store(ScalarKernel::exp(*x));
    for i in 0..4 {
        if slow[i].is_nan() {
            assert!(fast[i].is_nan(), "exp({})", x[i]);
        } else if slow[i].is_infinite() {
            assert_eq!(fast[i], slow[i], "exp({})", x[i]);
        } else {
            // one unit in the last place of slack where the result is subnormal
            let tolerance = 1e-5 * slow[i] + f32::from_bits(1);
            assert!((fast[i] - slow[i]).abs() <= tolerance, "exp({}) = {} vs {}", x[i], fast[i], slow[i]);
        }
    }
}

fn assert_log_agrees(x: &Lanes) {
    let fast = Native::store(Native::log(Native::load(x)));
    let slow = ScalarKernel::store(ScalarKernel::log(*x));
    for i in 0..4 {
        if slow[i].is_nan() {
            assert!(fast[i].is_nan(), "log({})", x[i]);
        } else if slow[i].is_infinite() {
            assert_eq!(fast[i], slow[i], "log({})", x[i]);
        } else {
            let tolerance = 1e-5 * slow[i].abs().max(1.0);
            assert!((fast[i] - slow[i]).abs() <= tolerance, "log({}) = {} vs {}", x[i], fast[i], slow[i]);
        }
    }
}

#[test]
fn test_exp_log_agree_over_corpus() {
    let mut rng = StdRng::seed_from_u64(4);
    let ordinary = (0..5_000).map(|_| std::array::from_fn(|_| rng.random_range(-104.0f32..89.0)));

    for x in corpus(5, 20_000).into_iter().chain(ordinary).chain(boundary_lanes()) {
        assert_exp_agrees(&x);
        assert_log_agrees(&x);
    }
}

#[test]
fn test_exp_range_ends() {
    let x = [89.0, 100.0, 1000.0, 88.7];
    let e = Native::store(Native::exp(Native::load(&x)));
    assert_eq!(&e[..3], &[f32::INFINITY; 3]);
    assert!(e[3].is_finite() && e[3] > 3.0e38);

    let x = [-88.0, -88.3, -1000.0, -104.0];
    let e = Native::store(Native::exp(Native::load(&x)));
    assert!(e[0].is_subnormal() && e[1].is_subnormal());
    assert_eq!(&e[2..], &[0.0, 0.0]);
}

#[test]
fn test_log_of_subnormals() {
    let x = [1.0e-40, f32::from_bits(1), 5.0e-39, f32::MAX];
    let l = Native::store(Native::log(Native::load(&x)));
    for i in 0..4 {
        assert!((l[i] - x[i].ln()).abs() <= 1e-5 * x[i].ln().abs(), "log({}) = {}", x[i], l[i]);
    }
    assert!(l[1] < -103.0);
}

#[test]
fn test_f32x4_view_uses_selected_kernel() {
    let v = F32x4::new(-1.0, 4.0, 9.0, -16.0);
    assert_eq!(v.abs().sqrt().to_array(), [1.0, 2.0, 3.0, 4.0]);
    assert_eq!(v.sign_mask(), 0b1001);
    assert_eq!((v * 2.0 - v).to_array(), v.to_array());
    assert!((v.exp().log() - v).to_array()[1..3].iter().all(|d| d.abs() < 1e-5));
}
