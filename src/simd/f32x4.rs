//! Four aligned `f32` lanes with a zero-copy register view.

use std::fmt;
use std::mem::{align_of, size_of};
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

use super::traits::{Float4Kernel, Lanes};
use super::Native;

/// Register type of the selected backend.
pub type Register = <Native as Float4Kernel>::Reg;

/// Number of `f32` lanes.
pub const LANE_COUNT: usize = 4;

/// Four `f32` lanes, 16-byte aligned.
///
/// The array and the backend register occupy the same bytes: the register is
/// never larger or more strictly aligned than `F32x4`, which is checked at
/// compile time below, so [`as_register`](F32x4::as_register) is a plain
/// reinterpretation rather than a load.
#[derive(Clone, Copy, Default, PartialEq)]
#[repr(C, align(16))]
pub struct F32x4(pub Lanes);

const _: () = assert!(size_of::<F32x4>() == size_of::<Register>());
const _: () = assert!(align_of::<F32x4>() >= align_of::<Register>());

impl F32x4 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        F32x4([x, y, z, w])
    }

    #[inline]
    pub const fn splat(value: f32) -> Self {
        F32x4([value; 4])
    }

    #[inline]
    pub fn as_register(&self) -> &Register {
        // SAFETY: same size, and `F32x4` is at least as aligned as `Register`;
        // every bit pattern is a valid `Register`.
        unsafe { &*(self as *const F32x4).cast::<Register>() }
    }

    #[inline]
    pub fn as_register_mut(&mut self) -> &mut Register {
        // SAFETY: see `as_register`.
        unsafe { &mut *(self as *mut F32x4).cast::<Register>() }
    }

    #[inline]
    pub fn from_register(reg: Register) -> Self {
        let mut out = F32x4::default();
        *out.as_register_mut() = reg;
        out
    }

    #[inline]
    pub const fn to_array(self) -> Lanes {
        self.0
    }

    #[inline]
    fn map(self, f: impl Fn(Register) -> Register) -> Self {
        F32x4::from_register(f(*self.as_register()))
    }

    #[inline]
    fn zip(self, rhs: Self, f: impl Fn(Register, Register) -> Register) -> Self {
        F32x4::from_register(f(*self.as_register(), *rhs.as_register()))
    }

    #[inline]
    pub fn dot(self, rhs: Self) -> f32 {
        Native::hsum(Native::mul(*self.as_register(), *rhs.as_register()))
    }

    #[inline]
    pub fn sum(self) -> f32 {
        Native::hsum(*self.as_register())
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn normalize(self) -> Self {
        F32x4(Native::normalize(&self.0))
    }

    #[inline]
    pub fn min(self, rhs: Self) -> Self {
        self.zip(rhs, Native::min)
    }

    #[inline]
    pub fn max(self, rhs: Self) -> Self {
        self.zip(rhs, Native::max)
    }

    #[inline]
    pub fn min_element(self) -> f32 {
        Native::hmin(*self.as_register())
    }

    #[inline]
    pub fn max_element(self) -> f32 {
        Native::hmax(*self.as_register())
    }

    #[inline]
    pub fn abs(self) -> Self {
        self.map(Native::abs)
    }

    #[inline]
    pub fn floor(self) -> Self {
        self.map(Native::floor)
    }

    #[inline]
    pub fn sqrt(self) -> Self {
        self.map(Native::sqrt)
    }

    #[inline]
    pub fn rcp(self) -> Self {
        self.map(Native::rcp)
    }

    #[inline]
    pub fn rsqrt(self) -> Self {
        self.map(Native::rsqrt)
    }

    #[inline]
    pub fn exp(self) -> Self {
        self.map(Native::exp)
    }

    #[inline]
    pub fn log(self) -> Self {
        self.map(Native::log)
    }

    #[inline]
    pub fn pow(self, exponent: Self) -> Self {
        F32x4(Native::pow(&self.0, &exponent.0))
    }

    #[inline]
    pub fn sign_mask(self) -> u32 {
        Native::sign_mask(*self.as_register())
    }
}

impl From<Lanes> for F32x4 {
    #[inline]
    fn from(lanes: Lanes) -> Self {
        F32x4(lanes)
    }
}

impl From<F32x4> for Lanes {
    #[inline]
    fn from(v: F32x4) -> Self {
        v.0
    }
}

impl fmt::Debug for F32x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("F32x4").field(&self.0).finish()
    }
}

impl Index<usize> for F32x4 {
    type Output = f32;

    #[inline]
    fn index(&self, index: usize) -> &f32 {
        &self.0[index]
    }
}

impl IndexMut<usize> for F32x4 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        &mut self.0[index]
    }
}

macro_rules! impl_lane_op {
    ($trait:ident, $method:ident) => {
        impl $trait for F32x4 {
            type Output = F32x4;

            #[inline]
            fn $method(self, rhs: F32x4) -> F32x4 {
                self.zip(rhs, Native::$method)
            }
        }

        impl $trait<f32> for F32x4 {
            type Output = F32x4;

            #[inline]
            fn $method(self, rhs: f32) -> F32x4 {
                self.zip(F32x4::splat(rhs), Native::$method)
            }
        }
    };
}

impl_lane_op!(Add, add);
impl_lane_op!(Sub, sub);
impl_lane_op!(Mul, mul);
impl_lane_op!(Div, div);

impl Neg for F32x4 {
    type Output = F32x4;

    #[inline]
    fn neg(self) -> F32x4 {
        self.map(Native::neg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_view_aliases_array() {
        let mut v = F32x4::new(1.0, 2.0, 3.0, 4.0);
        let doubled = Native::add(*v.as_register(), *v.as_register());
        *v.as_register_mut() = doubled;
        assert_eq!(v.to_array(), [2.0, 4.0, 6.0, 8.0]);
        assert_eq!(v[2], 6.0);
    }

    #[test]
    fn test_alignment() {
        assert_eq!(align_of::<F32x4>(), 16);
        let values = [F32x4::splat(1.0); 3];
        for v in &values {
            assert_eq!(v as *const F32x4 as usize % 16, 0);
        }
    }

    #[test]
    fn test_arithmetic_and_reductions() {
        let a = F32x4::new(1.0, -2.0, 3.0, -4.0);
        let b = F32x4::splat(2.0);
        assert_eq!((a + b).to_array(), [3.0, 0.0, 5.0, -2.0]);
        assert_eq!((a * 2.0).to_array(), [2.0, -4.0, 6.0, -8.0]);
        assert_eq!((-a).to_array(), [-1.0, 2.0, -3.0, 4.0]);
        assert_eq!(a.dot(b), -4.0);
        assert_eq!(a.sum(), -2.0);
        assert_eq!(a.min_element(), -4.0);
        assert_eq!(a.max_element(), 3.0);
        assert_eq!(a.abs().to_array(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(a.sign_mask(), 0b1010);
    }

    #[test]
    fn test_normalize_is_unit_length() {
        let v = F32x4::new(3.0, 4.0, 12.0, 0.0).normalize();
        assert!((v.length() - 1.0).abs() < 1e-5);
        assert!((v[0] - 3.0 / 13.0).abs() < 1e-5);
    }
}
