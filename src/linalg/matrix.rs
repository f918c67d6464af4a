use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use crate::error::{check_len, singular_matrix, LaneError, Result};
use crate::scalar::{Real, Scalar};
use crate::simd::scalar::{det2, det3, inverse2, inverse3};

use super::quaternion::Quaternion;
use super::vector::{vec2, vec3, vec4, Vec2, Vec3, Vector};

/// Square `N`x`N` matrix stored as `N` column vectors.
///
/// `m[c][r]` is the element in column `c`, row `r`. Matrix-vector products
/// treat vectors as columns (`M * v`) or rows (`v * M`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Matrix<T, const N: usize>(pub [Vector<T, N>; N]);

pub type Mat2<T> = Matrix<T, 2>;
pub type Mat3<T> = Matrix<T, 3>;
pub type Mat4<T> = Matrix<T, 4>;

/// The identity matrix.
impl<T: Scalar, const N: usize> Default for Matrix<T, N> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: Scalar, const N: usize> Matrix<T, N> {
    #[inline]
    pub const fn from_cols(cols: [Vector<T, N>; N]) -> Self {
        Matrix(cols)
    }

    #[inline]
    pub fn from_cols_array(cols: [[T; N]; N]) -> Self {
        Matrix(cols.map(Vector))
    }

    /// Builds a matrix from row arrays, the way matrices are written on paper.
    #[inline]
    pub fn from_rows(rows: [[T; N]; N]) -> Self {
        Matrix::from_cols_array(T::transpose_lanes(&rows))
    }

    #[inline]
    pub fn to_cols_array(self) -> [[T; N]; N] {
        self.0.map(|c| c.0)
    }

    #[inline]
    pub fn zero() -> Self {
        Matrix([Vector::zero(); N])
    }

    #[inline]
    pub fn identity() -> Self {
        Self::from_diagonal(Vector::splat(T::one()))
    }

    #[inline]
    pub fn from_diagonal(diagonal: Vector<T, N>) -> Self {
        let mut m = Self::zero();
        for i in 0..N {
            m.0[i].0[i] = diagonal.0[i];
        }
        m
    }

    #[inline]
    pub fn col(&self, index: usize) -> Vector<T, N> {
        self.0[index]
    }

    #[inline]
    pub fn row(&self, index: usize) -> Vector<T, N> {
        Vector(std::array::from_fn(|c| self.0[c].0[index]))
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols_array(T::transpose_lanes(&self.to_cols_array()))
    }

    /// Element-wise product.
    #[inline]
    pub fn comp_mul(&self, rhs: &Self) -> Self {
        Self::from_cols_array(T::comp_mul_lanes(&self.to_cols_array(), &rhs.to_cols_array()))
    }

    /// Outer product `c * r^T`: column `j` is `c * r[j]`.
    #[inline]
    pub fn outer(c: Vector<T, N>, r: Vector<T, N>) -> Self {
        Self::from_cols_array(T::outer_lanes(&c.0, &r.0))
    }

    #[inline]
    fn zip_cols(self, rhs: Self, f: impl Fn(Vector<T, N>, Vector<T, N>) -> Vector<T, N>) -> Self {
        Matrix(std::array::from_fn(|c| f(self.0[c], rhs.0[c])))
    }
}

/// Fails when `det` is zero or not finite.
fn check_invertible<T: Real>(det: T) -> Result<()> {
    if det == T::zero() || !det.is_finite() {
        Err(singular_matrix(det.to_f64().unwrap_or(f64::NAN)))
    } else {
        Ok(())
    }
}

impl<T: Real> Matrix<T, 2> {
    #[inline]
    pub fn determinant(&self) -> T {
        det2(&self.to_cols_array())
    }

    /// Undefined for singular matrices; see [`try_inverse`](Self::try_inverse).
    #[inline]
    pub fn inverse(&self) -> Self {
        Self::from_cols_array(inverse2(&self.to_cols_array()))
    }

    pub fn try_inverse(&self) -> Result<Self> {
        check_invertible(self.determinant())?;
        Ok(self.inverse())
    }

    /// Counter-clockwise rotation by `angle` radians.
    pub fn from_angle(angle: T) -> Self {
        let (sin, cos) = angle.sin_cos();
        Matrix([vec2(cos, sin), vec2(-sin, cos)])
    }

    pub fn from_scale(scale: Vec2<T>) -> Self {
        Self::from_diagonal(scale)
    }
}

impl<T: Real> Matrix<T, 3> {
    #[inline]
    pub fn determinant(&self) -> T {
        det3(&self.to_cols_array())
    }

    /// Undefined for singular matrices; see [`try_inverse`](Self::try_inverse).
    #[inline]
    pub fn inverse(&self) -> Self {
        Self::from_cols_array(inverse3(&self.to_cols_array()))
    }

    pub fn try_inverse(&self) -> Result<Self> {
        check_invertible(self.determinant())?;
        Ok(self.inverse())
    }

    pub fn from_scale(scale: Vec3<T>) -> Self {
        Self::from_diagonal(scale)
    }

    /// Rotation of `angle` radians about the unit vector `axis`.
    pub fn from_axis_angle(axis: Vec3<T>, angle: T) -> Self {
        Quaternion::from_axis_angle(axis, angle).to_mat3()
    }

    pub fn from_rotation_x(angle: T) -> Self {
        let (sin, cos) = angle.sin_cos();
        let (zero, one) = (T::zero(), T::one());
        Matrix([vec3(one, zero, zero), vec3(zero, cos, sin), vec3(zero, -sin, cos)])
    }

    pub fn from_rotation_y(angle: T) -> Self {
        let (sin, cos) = angle.sin_cos();
        let (zero, one) = (T::zero(), T::one());
        Matrix([vec3(cos, zero, -sin), vec3(zero, one, zero), vec3(sin, zero, cos)])
    }

    pub fn from_rotation_z(angle: T) -> Self {
        let (sin, cos) = angle.sin_cos();
        let (zero, one) = (T::zero(), T::one());
        Matrix([vec3(cos, sin, zero), vec3(-sin, cos, zero), vec3(zero, zero, one)])
    }

    /// Upper-left 3x3 block of `m`.
    pub fn from_mat4(m: &Matrix<T, 4>) -> Self {
        Matrix([m.0[0].truncate(), m.0[1].truncate(), m.0[2].truncate()])
    }
}

impl<T: Real> Matrix<T, 4> {
    #[inline]
    pub fn determinant(&self) -> T {
        T::det4(&self.to_cols_array())
    }

    /// Undefined for singular matrices; see [`try_inverse`](Self::try_inverse).
    #[inline]
    pub fn inverse(&self) -> Self {
        Self::from_cols_array(T::inverse4(&self.to_cols_array()))
    }

    pub fn try_inverse(&self) -> Result<Self> {
        check_invertible(self.determinant())?;
        Ok(self.inverse())
    }

    pub fn from_scale(scale: Vec3<T>) -> Self {
        Self::from_diagonal(scale.extend(T::one()))
    }

    pub fn from_translation(translation: Vec3<T>) -> Self {
        let mut m = Self::identity();
        m.0[3] = translation.extend(T::one());
        m
    }

    /// Rotation of `angle` radians about the unit vector `axis`.
    pub fn from_axis_angle(axis: Vec3<T>, angle: T) -> Self {
        Quaternion::from_axis_angle(axis, angle).to_mat4()
    }

    /// Embeds `m` as the upper-left block of an otherwise identity matrix.
    pub fn from_mat3(m: &Matrix<T, 3>) -> Self {
        let zero = T::zero();
        Matrix([
            m.0[0].extend(zero),
            m.0[1].extend(zero),
            m.0[2].extend(zero),
            vec4(zero, zero, zero, T::one()),
        ])
    }

    /// Transforms a point (`w = 1`), so translation applies.
    #[inline]
    pub fn transform_point3(&self, point: Vec3<T>) -> Vec3<T> {
        (*self * point.extend(T::one())).truncate()
    }

    /// Transforms a direction (`w = 0`), so translation is ignored.
    #[inline]
    pub fn transform_vector3(&self, direction: Vec3<T>) -> Vec3<T> {
        (*self * direction.extend(T::zero())).truncate()
    }
}

/// Reads `N * N` elements in column-major order.
impl<T: Scalar, const N: usize> TryFrom<&[T]> for Matrix<T, N> {
    type Error = LaneError;

    fn try_from(slice: &[T]) -> Result<Self> {
        check_len(N * N, slice.len())?;
        let mut cols = [[T::zero(); N]; N];
        for (col, chunk) in cols.iter_mut().zip(slice.chunks_exact(N.max(1))) {
            col.copy_from_slice(chunk);
        }
        Ok(Matrix::from_cols_array(cols))
    }
}

impl<T, const N: usize> Index<usize> for Matrix<T, N> {
    type Output = Vector<T, N>;

    #[inline]
    fn index(&self, index: usize) -> &Vector<T, N> {
        &self.0[index]
    }
}

impl<T, const N: usize> IndexMut<usize> for Matrix<T, N> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Vector<T, N> {
        &mut self.0[index]
    }
}

impl<T: Scalar, const N: usize> Mul for Matrix<T, N> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::from_cols_array(T::mat_mul_lanes(&self.to_cols_array(), &rhs.to_cols_array()))
    }
}

impl<T: Scalar, const N: usize> MulAssign for Matrix<T, N> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<T: Scalar, const N: usize> Mul<Vector<T, N>> for Matrix<T, N> {
    type Output = Vector<T, N>;

    #[inline]
    fn mul(self, rhs: Vector<T, N>) -> Vector<T, N> {
        Vector(T::mat_vec_lanes(&self.to_cols_array(), &rhs.0))
    }
}

impl<T: Scalar, const N: usize> Mul<Matrix<T, N>> for Vector<T, N> {
    type Output = Vector<T, N>;

    #[inline]
    fn mul(self, rhs: Matrix<T, N>) -> Vector<T, N> {
        Vector(T::vec_mat_lanes(&self.0, &rhs.to_cols_array()))
    }
}

impl<T: Scalar, const N: usize> Mul<T> for Matrix<T, N> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self {
        Matrix(self.0.map(|c| c * rhs))
    }
}

impl<T: Scalar, const N: usize> MulAssign<T> for Matrix<T, N> {
    #[inline]
    fn mul_assign(&mut self, rhs: T) {
        *self = *self * rhs;
    }
}

impl<T: Scalar, const N: usize> Div<T> for Matrix<T, N> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: T) -> Self {
        Matrix(self.0.map(|c| c / rhs))
    }
}

impl<T: Scalar, const N: usize> DivAssign<T> for Matrix<T, N> {
    #[inline]
    fn div_assign(&mut self, rhs: T) {
        *self = *self / rhs;
    }
}

impl<T: Scalar, const N: usize> Add for Matrix<T, N> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.zip_cols(rhs, |a, b| a + b)
    }
}

impl<T: Scalar, const N: usize> AddAssign for Matrix<T, N> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Scalar, const N: usize> Sub for Matrix<T, N> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.zip_cols(rhs, |a, b| a - b)
    }
}

impl<T: Scalar, const N: usize> SubAssign for Matrix<T, N> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Scalar + Neg<Output = T>, const N: usize> Neg for Matrix<T, N> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Matrix(self.0.map(|c| -c))
    }
}
