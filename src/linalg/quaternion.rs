use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use num::NumCast;

use crate::error::{check_len, LaneError};
use crate::scalar::Real;

use super::matrix::{Mat3, Mat4, Matrix};
use super::vector::{vec3, vec4, Vec3, Vec4, Vector};

/// Quaternion `w + xi + yj + zk`, stored `(x, y, z, w)`.
///
/// Rotation helpers (`rotate`, `to_mat3`, `to_mat4`, `slerp`) expect unit
/// quaternions.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct Quaternion<T> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub w: T,
}

pub type Quat = Quaternion<f32>;
pub type DQuat = Quaternion<f64>;

impl<T: Real> Default for Quaternion<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: Real> Quaternion<T> {
    #[inline]
    pub const fn new(x: T, y: T, z: T, w: T) -> Self {
        Quaternion { x, y, z, w }
    }

    #[inline]
    pub fn identity() -> Self {
        Quaternion::new(T::zero(), T::zero(), T::zero(), T::one())
    }

    #[inline]
    pub fn from_array([x, y, z, w]: [T; 4]) -> Self {
        Quaternion { x, y, z, w }
    }

    #[inline]
    pub fn to_array(self) -> [T; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Rotation of `angle` radians about the unit vector `axis`.
    pub fn from_axis_angle(axis: Vec3<T>, angle: T) -> Self {
        let half = angle / (T::one() + T::one());
        let (sin, cos) = half.sin_cos();
        let v = axis * sin;
        Quaternion::new(v.x(), v.y(), v.z(), cos)
    }

    /// The vector part `(x, y, z)`.
    #[inline]
    pub fn xyz(self) -> Vec3<T> {
        vec3(self.x, self.y, self.z)
    }

    #[inline]
    pub fn conjugate(self) -> Self {
        Quaternion::new(-self.x, -self.y, -self.z, self.w)
    }

    #[inline]
    pub fn dot(self, rhs: Self) -> T {
        Vec4::from(self).dot(rhs.into())
    }

    #[inline]
    pub fn length_squared(self) -> T {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> T {
        self.length_squared().sqrt()
    }

    /// Undefined for the zero quaternion.
    #[inline]
    pub fn normalize(self) -> Self {
        Vec4::from(self).normalize().into()
    }

    /// Multiplicative inverse, `conjugate / length_squared`. Undefined for the
    /// zero quaternion.
    #[inline]
    pub fn inverse(self) -> Self {
        let inv = self.length_squared().recip();
        let c = self.conjugate();
        Quaternion::new(c.x * inv, c.y * inv, c.z * inv, c.w * inv)
    }

    /// Rotates `v` by this unit quaternion.
    pub fn rotate(self, v: Vec3<T>) -> Vec3<T> {
        let u = self.xyz();
        let t = u.cross(v) * (T::one() + T::one());
        v + t * self.w + u.cross(t)
    }

    pub fn to_mat3(self) -> Mat3<T> {
        let Quaternion { x, y, z, w } = self;
        let one = T::one();
        let two = one + one;
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);
        Matrix([
            vec3(one - two * (yy + zz), two * (xy + wz), two * (xz - wy)),
            vec3(two * (xy - wz), one - two * (xx + zz), two * (yz + wx)),
            vec3(two * (xz + wy), two * (yz - wx), one - two * (xx + yy)),
        ])
    }

    pub fn to_mat4(self) -> Mat4<T> {
        Mat4::from_mat3(&self.to_mat3())
    }

    /// Spherical interpolation along the shorter arc from `self` (`t = 0`) to
    /// `end` (`t = 1`). Falls back to normalized linear interpolation when the
    /// inputs are nearly parallel.
    pub fn slerp(self, end: Self, t: T) -> Self {
        let mut end = end;
        let mut cos = self.dot(end);
        if cos < T::zero() {
            end = -end;
            cos = -cos;
        }

        let threshold = <T as NumCast>::from(0.9995).unwrap_or_else(T::one);
        let (a, b) = (Vec4::from(self), Vec4::from(end));
        if cos > threshold {
            return a.lerp(b, t).normalize().into();
        }

        let theta = cos.acos();
        let inv_sin = theta.sin().recip();
        let wa = ((T::one() - t) * theta).sin() * inv_sin;
        let wb = (t * theta).sin() * inv_sin;
        (a * wa + b * wb).into()
    }
}

impl<T> From<Quaternion<T>> for Vector<T, 4> {
    #[inline]
    fn from(q: Quaternion<T>) -> Self {
        vec4(q.x, q.y, q.z, q.w)
    }
}

impl<T: Copy> From<Vector<T, 4>> for Quaternion<T> {
    #[inline]
    fn from(v: Vector<T, 4>) -> Self {
        let [x, y, z, w] = v.0;
        Quaternion { x, y, z, w }
    }
}

impl<T: Real> TryFrom<&[T]> for Quaternion<T> {
    type Error = LaneError;

    fn try_from(slice: &[T]) -> Result<Self, Self::Error> {
        check_len(4, slice.len())?;
        Ok(Quaternion::new(slice[0], slice[1], slice[2], slice[3]))
    }
}

impl<T> Index<usize> for Quaternion<T> {
    type Output = T;

    /// `0..4` index `x, y, z, w`.
    fn index(&self, index: usize) -> &T {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("quaternion index out of range: {index}"),
        }
    }
}

impl<T> IndexMut<usize> for Quaternion<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("quaternion index out of range: {index}"),
        }
    }
}

/// Hamilton product: `a * b` applies `b` first, then `a`.
impl<T: Real> Mul for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Quaternion::from_array(T::quat_mul(&self.to_array(), &rhs.to_array()))
    }
}

impl<T: Real> MulAssign for Quaternion<T> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<T: Real> Mul<T> for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self {
        (Vec4::from(self) * rhs).into()
    }
}

impl<T: Real> MulAssign<T> for Quaternion<T> {
    #[inline]
    fn mul_assign(&mut self, rhs: T) {
        *self = *self * rhs;
    }
}

impl<T: Real> Div<T> for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: T) -> Self {
        (Vec4::from(self) / rhs).into()
    }
}

impl<T: Real> DivAssign<T> for Quaternion<T> {
    #[inline]
    fn div_assign(&mut self, rhs: T) {
        *self = *self / rhs;
    }
}

impl<T: Real> Mul<Vec3<T>> for Quaternion<T> {
    type Output = Vec3<T>;

    #[inline]
    fn mul(self, rhs: Vec3<T>) -> Vec3<T> {
        self.rotate(rhs)
    }
}

impl<T: Real> Add for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        (Vec4::from(self) + Vec4::from(rhs)).into()
    }
}

impl<T: Real> Sub for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        (Vec4::from(self) - Vec4::from(rhs)).into()
    }
}

impl<T: Real> AddAssign for Quaternion<T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Real> SubAssign for Quaternion<T> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Real> Neg for Quaternion<T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Quaternion::new(-self.x, -self.y, -self.z, -self.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn close(a: DQuat, b: DQuat) -> bool {
        (a - b).length() < 1e-12
    }

    #[test]
    fn test_basis_products() {
        let i = DQuat::new(1.0, 0.0, 0.0, 0.0);
        let j = DQuat::new(0.0, 1.0, 0.0, 0.0);
        let k = DQuat::new(0.0, 0.0, 1.0, 0.0);
        let minus_one = DQuat::new(0.0, 0.0, 0.0, -1.0);
        assert_eq!(i * j, k);
        assert_eq!(j * i, -k);
        assert_eq!(i * i, minus_one);
        assert_eq!(i * j * k, minus_one);
    }

    #[test]
    fn test_f32_product_matches_f64() {
        let a = Quat::new(0.1, -0.7, 0.3, 0.6);
        let b = Quat::new(-0.4, 0.2, 0.9, -0.1);
        let da = DQuat::new(0.1, -0.7, 0.3, 0.6);
        let db = DQuat::new(-0.4, 0.2, 0.9, -0.1);
        let p = (a * b).to_array();
        let q = (da * db).to_array();
        for (x, y) in p.iter().zip(q) {
            assert!((*x as f64 - y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_inverse_and_conjugate() {
        let q = DQuat::new(1.0, 2.0, 3.0, 4.0);
        assert!(close(q * q.inverse(), DQuat::identity()));
        assert!(close(q.inverse() * q, DQuat::identity()));
        let u = q.normalize();
        assert!((u.length() - 1.0).abs() < 1e-12);
        assert!(close(u.inverse(), u.conjugate()));
    }

    #[test]
    fn test_rotate_matches_matrix() {
        let q = DQuat::from_axis_angle(vec3(0.0, 0.0, 1.0), FRAC_PI_2);
        let v = vec3(1.0, 0.0, 0.0);
        assert!((q.rotate(v) - vec3(0.0, 1.0, 0.0)).length() < 1e-12);

        let q = DQuat::from_axis_angle(vec3(1.0, 2.0, -2.0).normalize(), 0.7);
        let v = vec3(0.3, -1.5, 2.0);
        assert!((q * v - q.to_mat3() * v).length() < 1e-12);
        assert!((q.to_mat4().transform_vector3(v) - q * v).length() < 1e-12);
    }

    #[test]
    fn test_composition_order() {
        let a = DQuat::from_axis_angle(vec3(0.0, 0.0, 1.0), FRAC_PI_2);
        let b = DQuat::from_axis_angle(vec3(1.0, 0.0, 0.0), FRAC_PI_2);
        let v = vec3(0.0, 1.0, 0.0);
        assert!(((a * b) * v - a * (b * v)).length() < 1e-12);
    }

    #[test]
    fn test_slerp() {
        let a = DQuat::identity();
        let b = DQuat::from_axis_angle(vec3(0.0, 1.0, 0.0), PI / 2.0);
        assert!(close(a.slerp(b, 0.0), a));
        assert!(close(a.slerp(b, 1.0), b));
        let mid = a.slerp(b, 0.5);
        assert!(close(mid, DQuat::from_axis_angle(vec3(0.0, 1.0, 0.0), PI / 4.0)));
        // -b is the same rotation; slerp takes the short arc either way.
        assert!(close(a.slerp(-b, 0.5), mid));
    }

    #[test]
    fn test_component_wise_operators() {
        let a = DQuat::new(2.0, 4.0, 6.0, 8.0);
        let b = DQuat::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(a / 2.0, DQuat::new(1.0, 2.0, 3.0, 4.0));

        let mut q = a;
        q -= b;
        assert_eq!(q, DQuat::new(1.0, 3.0, 5.0, 7.0));
        q += b;
        q /= 2.0;
        q *= 4.0;
        assert_eq!(q, a * 2.0);
    }

    #[test]
    fn test_slice_and_index() {
        let q = DQuat::try_from(&[1.0, 2.0, 3.0, 4.0][..]).expect("four lanes");
        assert_eq!(q[3], 4.0);
        assert_eq!(Vec4::from(q), vec4(1.0, 2.0, 3.0, 4.0));
        assert!(DQuat::try_from(&[1.0][..]).is_err());
    }
}
