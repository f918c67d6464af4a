//! 4-lane `f32` kernels with compile-time backend selection.
//!
//! | Backend | Module | Selected when |
//! |---------|--------|---------------|
//! | NEON | [`neon`] | `cfg(neon)`: AArch64 with `neon` |
//! | SSE2 (+AVX matrix kernels) | [`sse`] | `cfg(sse)`: x86/x86_64 with `sse2` |
//! | Scalar | [`scalar`] | `cfg(fallback)` or the `force-scalar` feature |
//!
//! The `cfg` flags come from `build.rs`. [`Native`] names the selected kernel;
//! [`ScalarKernel`] is always compiled so every backend can be compared
//! against it.
//!
//! ```rust
//! use lanemath::simd::{Float4Kernel, Native, ScalarKernel};
//!
//! let a = [1.0, 2.0, 3.0, 4.0];
//! let b = [4.0, 3.0, 2.0, 1.0];
//! assert_eq!(Native::dot(&a, &b), ScalarKernel::dot(&a, &b));
//! ```

pub mod f32x4;
pub mod scalar;
pub mod traits;

#[cfg(all(neon, target_arch = "aarch64"))]
pub mod neon;

#[cfg(all(sse, any(target_arch = "x86", target_arch = "x86_64")))]
pub mod sse;

pub use f32x4::F32x4;
pub use scalar::ScalarKernel;
pub use traits::{shuffle_mask, Columns, Float4Kernel, Lanes};

/// The kernel selected for this build.
#[cfg(all(neon, target_arch = "aarch64"))]
pub type Native = neon::NeonKernel;

/// The kernel selected for this build.
#[cfg(all(sse, any(target_arch = "x86", target_arch = "x86_64")))]
pub type Native = sse::SseKernel;

/// The kernel selected for this build.
#[cfg(not(any(
    all(neon, target_arch = "aarch64"),
    all(sse, any(target_arch = "x86", target_arch = "x86_64"))
)))]
pub type Native = ScalarKernel;

/// Name of the selected kernel, e.g. `"sse2+avx"`.
pub const fn backend() -> &'static str {
    <Native as Float4Kernel>::NAME
}
