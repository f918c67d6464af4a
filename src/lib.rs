//! # lanemath
//!
//! Small-vector math with kernels selected at compile time for the target CPU:
//!
//! - [`simd`]: 4-lane `f32` kernels ([`Float4Kernel`]) with NEON, SSE2 (+AVX)
//!   and scalar backends.
//! - [`linalg`]: vectors, column-major square matrices and quaternions built
//!   on those kernels.
//! - [`half`]: IEEE binary16 conversion ([`Half`]) using F16C or AArch64
//!   `fcvt` when available.
//! - [`bits`]: popcount, leading/trailing zero count and rotations.
//! - [`noise`]: seeded Perlin noise.
//!
//! `build.rs` inspects the target features of the build and emits one `cfg`
//! per usable instruction set; there is no runtime dispatch. Build with
//! `RUSTFLAGS="-C target-cpu=native"` to pick up everything the machine has,
//! or enable the `force-scalar` feature to use the portable path everywhere.
//!
//! ```rust
//! let selected = lanemath::backends();
//! println!("{selected}");
//! assert!(!selected.simd.is_empty());
//! ```

use std::fmt;

#[cfg(all(neon, not(target_arch = "aarch64")))]
compile_error!("the `neon` backend requires an aarch64 target");

#[cfg(all(sse, not(any(target_arch = "x86", target_arch = "x86_64"))))]
compile_error!("the `sse` backend requires an x86 or x86_64 target");

#[cfg(all(avx, not(sse)))]
compile_error!("the `avx` kernels extend the `sse` backend and cannot be enabled without it");

pub mod bits;
pub mod error;
pub mod half;
pub mod linalg;
pub mod noise;
pub mod scalar;
pub mod simd;

pub use error::{LaneError, Result};
pub use half::Half;
pub use linalg::{Mat2, Mat3, Mat4, Matrix, Quat, Quaternion, Vec2, Vec3, Vec4, Vector};
pub use noise::Perlin;
pub use scalar::{Real, Scalar};
pub use simd::{F32x4, Float4Kernel, Native};

/// Slices longer than this are converted on the rayon pool by the `par_*`
/// slice conversions; shorter ones stay on the calling thread.
pub const PARALLEL_SIMD_THRESHOLD: usize = 262_144;

/// Elements per rayon task in the `par_*` slice conversions.
pub const PARALLEL_CHUNK_SIZE: usize = 16_384;

/// Implementations selected for this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backends {
    /// [`simd::backend`].
    pub simd: &'static str,
    /// [`half::BACKEND`].
    pub half: &'static str,
    pub popcount: &'static str,
    pub clz: &'static str,
    pub ctz: &'static str,
    pub rotate: &'static str,
}

impl fmt::Display for Backends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "simd={} half={} popcount={} clz={} ctz={} rotate={}",
            self.simd, self.half, self.popcount, self.clz, self.ctz, self.rotate
        )
    }
}

/// Reports the kernel chosen for each component.
pub const fn backends() -> Backends {
    Backends {
        simd: simd::backend(),
        half: half::BACKEND,
        popcount: bits::POPCOUNT_BACKEND,
        clz: bits::CLZ_BACKEND,
        ctz: bits::CTZ_BACKEND,
        rotate: bits::ROTATE_BACKEND,
    }
}
