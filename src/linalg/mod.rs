//! Small fixed-size linear algebra: vectors, column-major square matrices and
//! quaternions.
//!
//! All types are generic over the lane type through [`Scalar`](crate::Scalar)
//! and [`Real`](crate::Real). `f32` values of the common shapes (3 and 4 lanes,
//! 4x4 matrices, quaternions) run on the selected SIMD kernel; everything else
//! uses portable loops.
//!
//! ```rust
//! use lanemath::linalg::{vec3, Mat4, Quat};
//!
//! let turn = Quat::from_axis_angle(vec3(0.0, 0.0, 1.0), std::f32::consts::FRAC_PI_2);
//! let m = Mat4::from_translation(vec3(1.0, 0.0, 0.0)) * turn.to_mat4();
//! let p = m.transform_point3(vec3(1.0, 0.0, 0.0));
//! assert!((p - vec3(1.0, 1.0, 0.0)).length() < 1e-6);
//! ```

pub mod matrix;
pub mod quaternion;
pub mod vector;

pub use matrix::{Mat2, Mat3, Mat4, Matrix};
pub use quaternion::{DQuat, Quat, Quaternion};
pub use vector::{vec2, vec3, vec4, Vec2, Vec3, Vec4, Vector};
