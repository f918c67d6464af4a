//! Lane types of the linear-algebra layer.
//!
//! [`Scalar`] and [`Real`] carry the lane-level operations used by
//! [`Vector`](crate::linalg::Vector), [`Matrix`](crate::linalg::Matrix) and
//! [`Quaternion`](crate::linalg::Quaternion). Every method has a portable
//! default; `f32` overrides them to route 4-lane (and zero-padded 3-lane)
//! work and 4x4 matrices through the [`Native`] kernel. Other lane counts and
//! `f64` stay on the portable loops.

use std::fmt::Debug;

use num::traits::{Bounded, NumAssign};
use num::Float;

use crate::simd::scalar as reference;
use crate::simd::{Columns, Float4Kernel, Lanes, Native};

#[inline]
fn lane_min<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}

#[inline]
fn lane_max<T: PartialOrd>(a: T, b: T) -> T {
    if b > a {
        b
    } else {
        a
    }
}

/// Numeric lane type: the integers and floats vectors and matrices hold.
pub trait Scalar:
    Copy + Default + Debug + PartialEq + PartialOrd + NumAssign + Bounded + Send + Sync + 'static
{
    #[inline]
    fn dot_lanes<const N: usize>(a: &[Self; N], b: &[Self; N]) -> Self {
        a.iter()
            .zip(b)
            .fold(Self::zero(), |acc, (&x, &y)| acc + x * y)
    }

    #[inline]
    fn sum_lanes<const N: usize>(a: &[Self; N]) -> Self {
        a.iter().fold(Self::zero(), |acc, &x| acc + x)
    }

    /// Smallest lane; zero for an empty array.
    #[inline]
    fn min_lane<const N: usize>(a: &[Self; N]) -> Self {
        a.iter().copied().reduce(lane_min).unwrap_or_else(Self::zero)
    }

    /// Largest lane; zero for an empty array.
    #[inline]
    fn max_lane<const N: usize>(a: &[Self; N]) -> Self {
        a.iter().copied().reduce(lane_max).unwrap_or_else(Self::zero)
    }

    #[inline]
    fn min_lanes<const N: usize>(a: &[Self; N], b: &[Self; N]) -> [Self; N] {
        std::array::from_fn(|i| lane_min(a[i], b[i]))
    }

    #[inline]
    fn max_lanes<const N: usize>(a: &[Self; N], b: &[Self; N]) -> [Self; N] {
        std::array::from_fn(|i| lane_max(a[i], b[i]))
    }

    /// Column-major matrix product.
    #[inline]
    fn mat_mul_lanes<const N: usize>(a: &[[Self; N]; N], b: &[[Self; N]; N]) -> [[Self; N]; N] {
        std::array::from_fn(|j| Self::mat_vec_lanes(a, &b[j]))
    }

    #[inline]
    fn mat_vec_lanes<const N: usize>(m: &[[Self; N]; N], v: &[Self; N]) -> [Self; N] {
        let mut out = [Self::zero(); N];
        for (col, &weight) in m.iter().zip(v) {
            for (dst, &x) in out.iter_mut().zip(col) {
                *dst += x * weight;
            }
        }
        out
    }

    #[inline]
    fn vec_mat_lanes<const N: usize>(v: &[Self; N], m: &[[Self; N]; N]) -> [Self; N] {
        std::array::from_fn(|j| Self::dot_lanes(v, &m[j]))
    }

    #[inline]
    fn transpose_lanes<const N: usize>(m: &[[Self; N]; N]) -> [[Self; N]; N] {
        std::array::from_fn(|c| std::array::from_fn(|r| m[r][c]))
    }

    #[inline]
    fn comp_mul_lanes<const N: usize>(a: &[[Self; N]; N], b: &[[Self; N]; N]) -> [[Self; N]; N] {
        std::array::from_fn(|c| std::array::from_fn(|r| a[c][r] * b[c][r]))
    }

    /// `c * r^T`, column-major.
    #[inline]
    fn outer_lanes<const N: usize>(c: &[Self; N], r: &[Self; N]) -> [[Self; N]; N] {
        std::array::from_fn(|j| std::array::from_fn(|i| c[i] * r[j]))
    }
}

/// Floating-point lane type.
///
/// Approximate methods (`rcp_lanes`, `rsqrt_lanes`, `exp_lanes`, `log_lanes`,
/// `pow_lanes`, `normalize_lanes`) may differ from the exact result by a small
/// relative error when a register kernel is used.
pub trait Real: Scalar + Float {
    /// Undefined for the zero vector.
    #[inline]
    fn normalize_lanes<const N: usize>(a: &[Self; N]) -> [Self; N] {
        let inv = Self::dot_lanes(a, a).sqrt().recip();
        a.map(|x| x * inv)
    }

    #[inline]
    fn abs_lanes<const N: usize>(a: &[Self; N]) -> [Self; N] {
        a.map(Float::abs)
    }

    #[inline]
    fn sqrt_lanes<const N: usize>(a: &[Self; N]) -> [Self; N] {
        a.map(Float::sqrt)
    }

    #[inline]
    fn rcp_lanes<const N: usize>(a: &[Self; N]) -> [Self; N] {
        a.map(Float::recip)
    }

    #[inline]
    fn rsqrt_lanes<const N: usize>(a: &[Self; N]) -> [Self; N] {
        a.map(|x| x.sqrt().recip())
    }

    #[inline]
    fn exp_lanes<const N: usize>(a: &[Self; N]) -> [Self; N] {
        a.map(Float::exp)
    }

    #[inline]
    fn log_lanes<const N: usize>(a: &[Self; N]) -> [Self; N] {
        a.map(Float::ln)
    }

    #[inline]
    fn pow_lanes<const N: usize>(a: &[Self; N], b: &[Self; N]) -> [Self; N] {
        std::array::from_fn(|i| a[i].powf(b[i]))
    }

    /// Sign bit of lane `i` in bit `i`.
    #[inline]
    fn sign_bits<const N: usize>(a: &[Self; N]) -> u32 {
        a.iter()
            .enumerate()
            .fold(0, |acc, (i, x)| acc | ((x.is_sign_negative() as u32) << i))
    }

    #[inline]
    fn cross3(a: &[Self; 3], b: &[Self; 3]) -> [Self; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Hamilton product of `(x, y, z, w)` quaternions.
    #[inline]
    fn quat_mul(a: &[Self; 4], b: &[Self; 4]) -> [Self; 4] {
        let [ax, ay, az, aw] = *a;
        let [bx, by, bz, bw] = *b;
        [
            aw * bx + ax * bw + ay * bz - az * by,
            aw * by - ax * bz + ay * bw + az * bx,
            aw * bz + ax * by - ay * bx + az * bw,
            aw * bw - ax * bx - ay * by - az * bz,
        ]
    }

    #[inline]
    fn det4(m: &[[Self; 4]; 4]) -> Self {
        reference::det4(m)
    }

    /// Undefined for singular matrices.
    #[inline]
    fn inverse4(m: &[[Self; 4]; 4]) -> [[Self; 4]; 4] {
        reference::inverse4(m)
    }
}

macro_rules! impl_scalar {
    ($($t:ty),*) => {
        $(impl Scalar for $t {})*
    };
}

impl_scalar!(i32, u32, i64, u64, f64);

impl Real for f64 {}

/// 4 lanes as-is, 3 lanes padded with `pad`.
#[inline(always)]
fn widen<const N: usize>(a: &[f32; N], pad: impl FnOnce(&[f32]) -> f32) -> Option<Lanes> {
    match *a.as_slice() {
        [x, y, z, w] => Some([x, y, z, w]),
        [x, y, z] => Some([x, y, z, pad(a.as_slice())]),
        _ => None,
    }
}

#[inline(always)]
fn zero_padded<const N: usize>(a: &[f32; N]) -> Option<Lanes> {
    widen(a, |_| 0.0)
}

#[inline(always)]
fn first_padded<const N: usize>(a: &[f32; N]) -> Option<Lanes> {
    widen(a, |s| s[0])
}

/// Only the 4-lane form, for element-wise kernels where padding is wasted work.
#[inline(always)]
fn exact4<const N: usize>(a: &[f32; N]) -> Option<Lanes> {
    match *a.as_slice() {
        [x, y, z, w] => Some([x, y, z, w]),
        _ => None,
    }
}

#[inline(always)]
fn narrow<const N: usize>(lanes: Lanes) -> [f32; N] {
    let mut out = [0.0; N];
    let n = N.min(4);
    out[..n].copy_from_slice(&lanes[..n]);
    out
}

#[inline(always)]
fn as_columns<const N: usize>(m: &[[f32; N]; N]) -> Option<Columns> {
    if N != 4 {
        return None;
    }
    let mut out = [[0.0; 4]; 4];
    for (dst, src) in out.iter_mut().zip(m) {
        dst.copy_from_slice(src);
    }
    Some(out)
}

#[inline(always)]
fn from_columns<const N: usize>(c: &Columns) -> [[f32; N]; N] {
    let mut out = [[0.0; N]; N];
    for (dst, src) in out.iter_mut().zip(c) {
        dst.copy_from_slice(&src[..N]);
    }
    out
}

impl Scalar for f32 {
    #[inline]
    fn dot_lanes<const N: usize>(a: &[f32; N], b: &[f32; N]) -> f32 {
        match (zero_padded(a), zero_padded(b)) {
            (Some(a), Some(b)) => Native::dot(&a, &b),
            _ => a.iter().zip(b).fold(0.0, |acc, (&x, &y)| acc + x * y),
        }
    }

    #[inline]
    fn sum_lanes<const N: usize>(a: &[f32; N]) -> f32 {
        match zero_padded(a) {
            Some(a) => Native::sum(&a),
            None => a.iter().sum(),
        }
    }

    #[inline]
    fn min_lane<const N: usize>(a: &[f32; N]) -> f32 {
        match first_padded(a) {
            Some(a) => Native::hmin(Native::load(&a)),
            None => a.iter().copied().reduce(lane_min).unwrap_or(0.0),
        }
    }

    #[inline]
    fn max_lane<const N: usize>(a: &[f32; N]) -> f32 {
        match first_padded(a) {
            Some(a) => Native::hmax(Native::load(&a)),
            None => a.iter().copied().reduce(lane_max).unwrap_or(0.0),
        }
    }

    #[inline]
    fn min_lanes<const N: usize>(a: &[f32; N], b: &[f32; N]) -> [f32; N] {
        match (exact4(a), exact4(b)) {
            (Some(a), Some(b)) => narrow(Native::store(Native::min(Native::load(&a), Native::load(&b)))),
            _ => std::array::from_fn(|i| lane_min(a[i], b[i])),
        }
    }

    #[inline]
    fn max_lanes<const N: usize>(a: &[f32; N], b: &[f32; N]) -> [f32; N] {
        match (exact4(a), exact4(b)) {
            (Some(a), Some(b)) => narrow(Native::store(Native::max(Native::load(&a), Native::load(&b)))),
            _ => std::array::from_fn(|i| lane_max(a[i], b[i])),
        }
    }

    #[inline]
    fn mat_mul_lanes<const N: usize>(a: &[[f32; N]; N], b: &[[f32; N]; N]) -> [[f32; N]; N] {
        match (as_columns(a), as_columns(b)) {
            (Some(a), Some(b)) => from_columns(&Native::mat_mul(&a, &b)),
            _ => std::array::from_fn(|j| Self::mat_vec_lanes(a, &b[j])),
        }
    }

    #[inline]
    fn mat_vec_lanes<const N: usize>(m: &[[f32; N]; N], v: &[f32; N]) -> [f32; N] {
        if let (Some(cols), Some(v)) = (as_columns(m), exact4(v)) {
            return narrow(Native::mat_mul_vec(&cols, &v));
        }
        let mut out = [0.0; N];
        for (col, &weight) in m.iter().zip(v) {
            for (dst, &x) in out.iter_mut().zip(col) {
                *dst += x * weight;
            }
        }
        out
    }

    #[inline]
    fn vec_mat_lanes<const N: usize>(v: &[f32; N], m: &[[f32; N]; N]) -> [f32; N] {
        match (exact4(v), as_columns(m)) {
            (Some(v), Some(cols)) => narrow(Native::vec_mul_mat(&v, &cols)),
            _ => std::array::from_fn(|j| Self::dot_lanes(v, &m[j])),
        }
    }

    #[inline]
    fn transpose_lanes<const N: usize>(m: &[[f32; N]; N]) -> [[f32; N]; N] {
        match as_columns(m) {
            Some(cols) => from_columns(&Native::transpose(&cols)),
            None => std::array::from_fn(|c| std::array::from_fn(|r| m[r][c])),
        }
    }

    #[inline]
    fn comp_mul_lanes<const N: usize>(a: &[[f32; N]; N], b: &[[f32; N]; N]) -> [[f32; N]; N] {
        match (as_columns(a), as_columns(b)) {
            (Some(a), Some(b)) => from_columns(&Native::comp_mul(&a, &b)),
            _ => std::array::from_fn(|c| std::array::from_fn(|r| a[c][r] * b[c][r])),
        }
    }

    #[inline]
    fn outer_lanes<const N: usize>(c: &[f32; N], r: &[f32; N]) -> [[f32; N]; N] {
        match (exact4(c), exact4(r)) {
            (Some(c), Some(r)) => from_columns(&Native::outer(&c, &r)),
            _ => std::array::from_fn(|j| std::array::from_fn(|i| c[i] * r[j])),
        }
    }
}

impl Real for f32 {
    #[inline]
    fn normalize_lanes<const N: usize>(a: &[f32; N]) -> [f32; N] {
        match zero_padded(a) {
            Some(lanes) => narrow(Native::normalize(&lanes)),
            None => {
                let inv = Self::dot_lanes(a, a).sqrt().recip();
                a.map(|x| x * inv)
            }
        }
    }

    #[inline]
    fn abs_lanes<const N: usize>(a: &[f32; N]) -> [f32; N] {
        match exact4(a) {
            Some(lanes) => narrow(Native::store(Native::abs(Native::load(&lanes)))),
            None => a.map(f32::abs),
        }
    }

    #[inline]
    fn sqrt_lanes<const N: usize>(a: &[f32; N]) -> [f32; N] {
        match exact4(a) {
            Some(lanes) => narrow(Native::store(Native::sqrt(Native::load(&lanes)))),
            None => a.map(f32::sqrt),
        }
    }

    #[inline]
    fn rcp_lanes<const N: usize>(a: &[f32; N]) -> [f32; N] {
        match exact4(a) {
            Some(lanes) => narrow(Native::store(Native::rcp(Native::load(&lanes)))),
            None => a.map(f32::recip),
        }
    }

    #[inline]
    fn rsqrt_lanes<const N: usize>(a: &[f32; N]) -> [f32; N] {
        match exact4(a) {
            Some(lanes) => narrow(Native::store(Native::rsqrt(Native::load(&lanes)))),
            None => a.map(|x| 1.0 / x.sqrt()),
        }
    }

    #[inline]
    fn exp_lanes<const N: usize>(a: &[f32; N]) -> [f32; N] {
        match exact4(a) {
            Some(lanes) => narrow(Native::store(Native::exp(Native::load(&lanes)))),
            None => a.map(f32::exp),
        }
    }

    #[inline]
    fn log_lanes<const N: usize>(a: &[f32; N]) -> [f32; N] {
        match exact4(a) {
            Some(lanes) => narrow(Native::store(Native::log(Native::load(&lanes)))),
            None => a.map(f32::ln),
        }
    }

    #[inline]
    fn pow_lanes<const N: usize>(a: &[f32; N], b: &[f32; N]) -> [f32; N] {
        match (exact4(a), exact4(b)) {
            (Some(x), Some(y)) => narrow(Native::pow(&x, &y)),
            _ => std::array::from_fn(|i| a[i].powf(b[i])),
        }
    }

    #[inline]
    fn sign_bits<const N: usize>(a: &[f32; N]) -> u32 {
        match exact4(a) {
            Some(lanes) => Native::sign_mask(Native::load(&lanes)),
            None => a
                .iter()
                .enumerate()
                .fold(0, |acc, (i, x)| acc | ((x.is_sign_negative() as u32) << i)),
        }
    }

    #[inline]
    fn cross3(a: &[f32; 3], b: &[f32; 3]) -> [f32; 3] {
        let [ax, ay, az] = *a;
        let [bx, by, bz] = *b;
        let [x, y, z, _] = Native::cross(&[ax, ay, az, 0.0], &[bx, by, bz, 0.0]);
        [x, y, z]
    }

    #[inline]
    fn quat_mul(a: &[f32; 4], b: &[f32; 4]) -> [f32; 4] {
        Native::quat_mul(a, b)
    }

    #[inline]
    fn det4(m: &[[f32; 4]; 4]) -> f32 {
        Native::determinant(m)
    }

    #[inline]
    fn inverse4(m: &[[f32; 4]; 4]) -> [[f32; 4]; 4] {
        Native::inverse(m)
    }
}
