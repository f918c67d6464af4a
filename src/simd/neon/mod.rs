//! ARM NEON backend on `float32x4_t`.
//!
//! NEON is mandatory on AArch64, so this backend is selected on every
//! AArch64 target unless `force-scalar` is set.
//!
//! # Differences from the SSE2 backend
//!
//! - `rcp`/`rsqrt` refine the 8-bit `vrecpeq`/`vrsqrteq` estimates with two
//!   Newton-Raphson steps (`vrecpsq`/`vrsqrtsq`), not one.
//! - Horizontal reductions are single instructions (`vaddvq`, `vminvq`,
//!   `vmaxvq`).
//! - NEON has no general two-source shuffle with an immediate, so `shuffle`
//!   goes through a lane array; the compiler folds constant masks into
//!   `ext`/`zip`/`dup` sequences.
//! - `transpose` is one de-interleaving load (`vld4q_f32`).

use std::arch::aarch64::*;

use super::traits::{Columns, Float4Kernel, Lanes};

pub mod math;

use math::{vexpq_f32, vlogq_f32};

/// `float32x4_t` implementation of [`Float4Kernel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NeonKernel;

impl Float4Kernel for NeonKernel {
    type Reg = float32x4_t;

    const NAME: &'static str = "neon";

    #[inline(always)]
    fn load(lanes: &Lanes) -> float32x4_t {
        unsafe { vld1q_f32(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn store(reg: float32x4_t) -> Lanes {
        let mut out = [0.0; 4];
        unsafe { vst1q_f32(out.as_mut_ptr(), reg) };
        out
    }

    #[inline(always)]
    fn splat(value: f32) -> float32x4_t {
        unsafe { vdupq_n_f32(value) }
    }

    #[inline(always)]
    fn add(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vaddq_f32(a, b) }
    }

    #[inline(always)]
    fn sub(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vsubq_f32(a, b) }
    }

    #[inline(always)]
    fn mul(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vmulq_f32(a, b) }
    }

    #[inline(always)]
    fn div(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vdivq_f32(a, b) }
    }

    #[inline(always)]
    fn min(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vminq_f32(a, b) }
    }

    #[inline(always)]
    fn max(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vmaxq_f32(a, b) }
    }

    #[inline(always)]
    fn abs(a: float32x4_t) -> float32x4_t {
        unsafe { vabsq_f32(a) }
    }

    #[inline(always)]
    fn neg(a: float32x4_t) -> float32x4_t {
        unsafe { vnegq_f32(a) }
    }

    #[inline(always)]
    fn floor(a: float32x4_t) -> float32x4_t {
        unsafe { vrndmq_f32(a) }
    }

    #[inline(always)]
    fn sqrt(a: float32x4_t) -> float32x4_t {
        unsafe { vsqrtq_f32(a) }
    }

    #[inline(always)]
    fn rcp(a: float32x4_t) -> float32x4_t {
        unsafe {
            let mut e = vrecpeq_f32(a);
            e = vmulq_f32(vrecpsq_f32(a, e), e);
            vmulq_f32(vrecpsq_f32(a, e), e)
        }
    }

    #[inline(always)]
    fn rsqrt(a: float32x4_t) -> float32x4_t {
        unsafe {
            let mut e = vrsqrteq_f32(a);
            e = vmulq_f32(e, vrsqrtsq_f32(vmulq_f32(a, e), e));
            vmulq_f32(e, vrsqrtsq_f32(vmulq_f32(a, e), e))
        }
    }

    #[inline(always)]
    fn hsum(a: float32x4_t) -> f32 {
        unsafe { vaddvq_f32(a) }
    }

    #[inline(always)]
    fn hmin(a: float32x4_t) -> f32 {
        unsafe { vminvq_f32(a) }
    }

    #[inline(always)]
    fn hmax(a: float32x4_t) -> f32 {
        unsafe { vmaxvq_f32(a) }
    }

    #[inline(always)]
    fn shuffle<const MASK: i32>(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        let m = MASK as usize;
        let a = Self::store(a);
        let b = Self::store(b);
        Self::load(&[a[m & 3], a[(m >> 2) & 3], b[(m >> 4) & 3], b[(m >> 6) & 3]])
    }

    #[inline(always)]
    fn sign_mask(a: float32x4_t) -> u32 {
        const WEIGHTS: [u32; 4] = [1, 2, 4, 8];
        unsafe {
            let signs = vshrq_n_u32::<31>(vreinterpretq_u32_f32(a));
            vaddvq_u32(vmulq_u32(signs, vld1q_u32(WEIGHTS.as_ptr())))
        }
    }

    #[inline(always)]
    fn exp(a: float32x4_t) -> float32x4_t {
        unsafe { vexpq_f32(a) }
    }

    #[inline(always)]
    fn log(a: float32x4_t) -> float32x4_t {
        unsafe { vlogq_f32(a) }
    }

    #[inline]
    fn transpose(m: &Columns) -> Columns {
        unsafe {
            let rows = vld4q_f32(m.as_ptr().cast::<f32>());
            [
                Self::store(rows.0),
                Self::store(rows.1),
                Self::store(rows.2),
                Self::store(rows.3),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::scalar::ScalarKernel;

    #[test]
    fn test_vld4_transpose_matches_reference() {
        let m = [
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ];
        assert_eq!(NeonKernel::transpose(&m), ScalarKernel::transpose(&m));
    }

    #[test]
    fn test_sign_mask() {
        let v = NeonKernel::load(&[-1.0, 0.0, -0.0, 2.0]);
        assert_eq!(NeonKernel::sign_mask(v), 0b0101);
    }

    #[test]
    fn test_refined_estimates() {
        for x in [0.001f32, 0.5, 3.0, 1234.5] {
            let r = NeonKernel::store(NeonKernel::rcp(NeonKernel::splat(x)))[0];
            assert!((r * x - 1.0).abs() < 1e-5);
            let s = NeonKernel::store(NeonKernel::rsqrt(NeonKernel::splat(x)))[0];
            assert!((s * x.sqrt() - 1.0).abs() < 1e-5);
        }
    }
}
