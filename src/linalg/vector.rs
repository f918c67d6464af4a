use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use crate::error::{check_len, LaneError};
use crate::scalar::{Real, Scalar};
use crate::simd::F32x4;

/// Fixed-size vector of `N` lanes.
///
/// Comparison (`<`, `>`, ...) is lexicographic over the lanes, which gives
/// vectors a total order for sorting when the lanes have one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Vector<T, const N: usize>(pub [T; N]);

pub type Vec2<T> = Vector<T, 2>;
pub type Vec3<T> = Vector<T, 3>;
pub type Vec4<T> = Vector<T, 4>;

#[inline]
pub const fn vec2<T>(x: T, y: T) -> Vec2<T> {
    Vector([x, y])
}

#[inline]
pub const fn vec3<T>(x: T, y: T, z: T) -> Vec3<T> {
    Vector([x, y, z])
}

#[inline]
pub const fn vec4<T>(x: T, y: T, z: T, w: T) -> Vec4<T> {
    Vector([x, y, z, w])
}

impl<T: Scalar, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Scalar, const N: usize> Vector<T, N> {
    #[inline]
    pub const fn new(lanes: [T; N]) -> Self {
        Vector(lanes)
    }

    #[inline]
    pub fn zero() -> Self {
        Vector([T::zero(); N])
    }

    #[inline]
    pub fn splat(value: T) -> Self {
        Vector([value; N])
    }

    #[inline]
    pub const fn to_array(self) -> [T; N] {
        self.0
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    #[inline]
    pub fn dot(self, rhs: Self) -> T {
        T::dot_lanes(&self.0, &rhs.0)
    }

    #[inline]
    pub fn length_squared(self) -> T {
        self.dot(self)
    }

    #[inline]
    pub fn sum(self) -> T {
        T::sum_lanes(&self.0)
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, rhs: Self) -> Self {
        Vector(T::min_lanes(&self.0, &rhs.0))
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, rhs: Self) -> Self {
        Vector(T::max_lanes(&self.0, &rhs.0))
    }

    #[inline]
    pub fn min_element(self) -> T {
        T::min_lane(&self.0)
    }

    #[inline]
    pub fn max_element(self) -> T {
        T::max_lane(&self.0)
    }

    /// Adds one to every lane.
    #[inline]
    pub fn inc(&mut self) -> &mut Self {
        *self += T::one();
        self
    }

    /// Subtracts one from every lane.
    #[inline]
    pub fn dec(&mut self) -> &mut Self {
        *self -= T::one();
        self
    }

    #[inline]
    fn zip_with(self, rhs: Self, f: impl Fn(T, T) -> T) -> Self {
        Vector(std::array::from_fn(|i| f(self.0[i], rhs.0[i])))
    }
}

impl<T: Real, const N: usize> Vector<T, N> {
    #[inline]
    pub fn length(self) -> T {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn distance(self, rhs: Self) -> T {
        (self - rhs).length()
    }

    /// Unit vector in the same direction. Undefined for the zero vector.
    #[inline]
    pub fn normalize(self) -> Self {
        Vector(T::normalize_lanes(&self.0))
    }

    /// `1 / sum()`.
    #[inline]
    pub fn recip_sum(self) -> T {
        self.sum().recip()
    }

    /// Approximate component-wise reciprocal.
    #[inline]
    pub fn rcp(self) -> Self {
        Vector(T::rcp_lanes(&self.0))
    }

    /// Approximate component-wise `1 / sqrt(x)`.
    #[inline]
    pub fn inverse_sqrt(self) -> Self {
        Vector(T::rsqrt_lanes(&self.0))
    }

    #[inline]
    pub fn sqrt(self) -> Self {
        Vector(T::sqrt_lanes(&self.0))
    }

    #[inline]
    pub fn abs(self) -> Self {
        Vector(T::abs_lanes(&self.0))
    }

    #[inline]
    pub fn exp(self) -> Self {
        Vector(T::exp_lanes(&self.0))
    }

    #[inline]
    pub fn log(self) -> Self {
        Vector(T::log_lanes(&self.0))
    }

    /// Component-wise `self^exponent`, defined for positive lanes.
    #[inline]
    pub fn pow(self, exponent: Self) -> Self {
        Vector(T::pow_lanes(&self.0, &exponent.0))
    }

    /// Sign bit of lane `i` in bit `i`.
    #[inline]
    pub fn sign_mask(self) -> u32 {
        T::sign_bits(&self.0)
    }

    #[inline]
    pub fn lerp(self, rhs: Self, t: T) -> Self {
        self + (rhs - self) * t
    }
}

impl<T: Scalar> Vector<T, 2> {
    #[inline]
    pub fn x(self) -> T {
        self.0[0]
    }

    #[inline]
    pub fn y(self) -> T {
        self.0[1]
    }

    #[inline]
    pub fn extend(self, z: T) -> Vec3<T> {
        vec3(self.0[0], self.0[1], z)
    }
}

impl<T: Scalar> Vector<T, 3> {
    #[inline]
    pub fn x(self) -> T {
        self.0[0]
    }

    #[inline]
    pub fn y(self) -> T {
        self.0[1]
    }

    #[inline]
    pub fn z(self) -> T {
        self.0[2]
    }

    #[inline]
    pub fn extend(self, w: T) -> Vec4<T> {
        vec4(self.0[0], self.0[1], self.0[2], w)
    }

    #[inline]
    pub fn truncate(self) -> Vec2<T> {
        vec2(self.0[0], self.0[1])
    }
}

impl<T: Real> Vector<T, 3> {
    #[inline]
    pub fn cross(self, rhs: Self) -> Self {
        Vector(T::cross3(&self.0, &rhs.0))
    }
}

impl<T: Scalar> Vector<T, 4> {
    #[inline]
    pub fn x(self) -> T {
        self.0[0]
    }

    #[inline]
    pub fn y(self) -> T {
        self.0[1]
    }

    #[inline]
    pub fn z(self) -> T {
        self.0[2]
    }

    #[inline]
    pub fn w(self) -> T {
        self.0[3]
    }

    #[inline]
    pub fn truncate(self) -> Vec3<T> {
        vec3(self.0[0], self.0[1], self.0[2])
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T, N> {
    #[inline]
    fn from(lanes: [T; N]) -> Self {
        Vector(lanes)
    }
}

impl<T, const N: usize> From<Vector<T, N>> for [T; N] {
    #[inline]
    fn from(v: Vector<T, N>) -> Self {
        v.0
    }
}

impl<T: Scalar, const N: usize> TryFrom<&[T]> for Vector<T, N> {
    type Error = LaneError;

    fn try_from(slice: &[T]) -> Result<Self, Self::Error> {
        check_len(N, slice.len())?;
        let mut lanes = [T::zero(); N];
        lanes.copy_from_slice(slice);
        Ok(Vector(lanes))
    }
}

impl From<F32x4> for Vec4<f32> {
    #[inline]
    fn from(v: F32x4) -> Self {
        Vector(v.0)
    }
}

impl From<Vec4<f32>> for F32x4 {
    #[inline]
    fn from(v: Vec4<f32>) -> Self {
        F32x4(v.0)
    }
}

impl<T, const N: usize> AsRef<[T]> for Vector<T, N> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        &self.0
    }
}

impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.0[index]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.0[index]
    }
}

macro_rules! impl_vector_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl<T: Scalar, const N: usize> $trait for Vector<T, N> {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self {
                self.zip_with(rhs, |a, b| a $op b)
            }
        }

        impl<T: Scalar, const N: usize> $trait<T> for Vector<T, N> {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: T) -> Self {
                Vector(self.0.map(|a| a $op rhs))
            }
        }

        impl<T: Scalar, const N: usize> $assign_trait for Vector<T, N> {
            #[inline]
            fn $assign_method(&mut self, rhs: Self) {
                *self = *self $op rhs;
            }
        }

        impl<T: Scalar, const N: usize> $assign_trait<T> for Vector<T, N> {
            #[inline]
            fn $assign_method(&mut self, rhs: T) {
                *self = *self $op rhs;
            }
        }
    };
}

impl_vector_op!(Add, add, AddAssign, add_assign, +);
impl_vector_op!(Sub, sub, SubAssign, sub_assign, -);
impl_vector_op!(Mul, mul, MulAssign, mul_assign, *);
impl_vector_op!(Div, div, DivAssign, div_assign, /);

impl<T: Scalar + Neg<Output = T>, const N: usize> Neg for Vector<T, N> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Vector(self.0.map(|a| -a))
    }
}

macro_rules! impl_scalar_lhs_mul {
    ($($t:ty),*) => {
        $(
            impl<const N: usize> Mul<Vector<$t, N>> for $t {
                type Output = Vector<$t, N>;

                #[inline]
                fn mul(self, rhs: Vector<$t, N>) -> Vector<$t, N> {
                    rhs * self
                }
            }
        )*
    };
}

impl_scalar_lhs_mul!(i32, u32, i64, u64, f32, f64);
