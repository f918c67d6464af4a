//! SSE2 backend on `__m128`.
//!
//! SSE2 is part of the x86_64 baseline, so this backend is available on every
//! x86_64 target. `rcp`/`rsqrt` start from the 12-bit hardware estimates
//! (`rcpps`, `rsqrtps`) and apply one Newton-Raphson step, which brings the
//! relative error to about 1e-7.
//!
//! With the `avx` target feature the 4x4 matrix product and component-wise
//! product are replaced by 256-bit versions in [`avx`].

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::traits::{Float4Kernel, Lanes};

#[cfg(avx)]
use super::traits::Columns;

#[cfg(avx)]
pub mod avx;
pub mod math;

use math::{_mm_exp_ps, _mm_floor_ps_sse2, _mm_log_ps};

/// `__m128` implementation of [`Float4Kernel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SseKernel;

impl Float4Kernel for SseKernel {
    type Reg = __m128;

    const NAME: &'static str = if cfg!(avx) { "sse2+avx" } else { "sse2" };

    #[inline(always)]
    fn load(lanes: &Lanes) -> __m128 {
        unsafe { _mm_loadu_ps(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn store(reg: __m128) -> Lanes {
        let mut out = [0.0; 4];
        unsafe { _mm_storeu_ps(out.as_mut_ptr(), reg) };
        out
    }

    #[inline(always)]
    fn splat(value: f32) -> __m128 {
        unsafe { _mm_set1_ps(value) }
    }

    #[inline(always)]
    fn add(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_add_ps(a, b) }
    }

    #[inline(always)]
    fn sub(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_sub_ps(a, b) }
    }

    #[inline(always)]
    fn mul(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_mul_ps(a, b) }
    }

    #[inline(always)]
    fn div(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_div_ps(a, b) }
    }

    #[inline(always)]
    fn min(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_min_ps(a, b) }
    }

    #[inline(always)]
    fn max(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_max_ps(a, b) }
    }

    #[inline(always)]
    fn abs(a: __m128) -> __m128 {
        unsafe { _mm_andnot_ps(_mm_set1_ps(-0.0), a) }
    }

    #[inline(always)]
    fn neg(a: __m128) -> __m128 {
        unsafe { _mm_xor_ps(_mm_set1_ps(-0.0), a) }
    }

    #[inline(always)]
    fn floor(a: __m128) -> __m128 {
        unsafe { _mm_floor_ps_sse2(a) }
    }

    #[inline(always)]
    fn sqrt(a: __m128) -> __m128 {
        unsafe { _mm_sqrt_ps(a) }
    }

    #[inline(always)]
    fn rcp(a: __m128) -> __m128 {
        unsafe {
            // x1 = x0 * (2 - a * x0)
            let x0 = _mm_rcp_ps(a);
            _mm_mul_ps(x0, _mm_sub_ps(_mm_set1_ps(2.0), _mm_mul_ps(a, x0)))
        }
    }

    #[inline(always)]
    fn rsqrt(a: __m128) -> __m128 {
        unsafe {
            // y1 = y0 * (1.5 - 0.5 * a * y0 * y0)
            let y0 = _mm_rsqrt_ps(a);
            let half_a = _mm_mul_ps(_mm_set1_ps(0.5), a);
            let muls = _mm_mul_ps(_mm_mul_ps(half_a, y0), y0);
            _mm_mul_ps(y0, _mm_sub_ps(_mm_set1_ps(1.5), muls))
        }
    }

    #[inline(always)]
    fn hsum(a: __m128) -> f32 {
        unsafe {
            let high = _mm_movehl_ps(a, a);
            let pairs = _mm_add_ps(a, high);
            let odd = _mm_shuffle_ps::<0b01>(pairs, pairs);
            _mm_cvtss_f32(_mm_add_ss(pairs, odd))
        }
    }

    #[inline(always)]
    fn hmin(a: __m128) -> f32 {
        unsafe {
            let high = _mm_movehl_ps(a, a);
            let pairs = _mm_min_ps(a, high);
            let odd = _mm_shuffle_ps::<0b01>(pairs, pairs);
            _mm_cvtss_f32(_mm_min_ss(pairs, odd))
        }
    }

    #[inline(always)]
    fn hmax(a: __m128) -> f32 {
        unsafe {
            let high = _mm_movehl_ps(a, a);
            let pairs = _mm_max_ps(a, high);
            let odd = _mm_shuffle_ps::<0b01>(pairs, pairs);
            _mm_cvtss_f32(_mm_max_ss(pairs, odd))
        }
    }

    #[inline(always)]
    fn shuffle<const MASK: i32>(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_shuffle_ps::<MASK>(a, b) }
    }

    #[inline(always)]
    fn sign_mask(a: __m128) -> u32 {
        unsafe { _mm_movemask_ps(a) as u32 }
    }

    #[inline(always)]
    fn exp(a: __m128) -> __m128 {
        unsafe { _mm_exp_ps(a) }
    }

    #[inline(always)]
    fn log(a: __m128) -> __m128 {
        unsafe { _mm_log_ps(a) }
    }

    #[cfg(avx)]
    #[inline]
    fn mat_mul(a: &Columns, b: &Columns) -> Columns {
        avx::mat_mul(a, b)
    }

    #[cfg(avx)]
    #[inline]
    fn comp_mul(a: &Columns, b: &Columns) -> Columns {
        avx::comp_mul(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::scalar::ScalarKernel;
    use crate::simd::traits::shuffle_mask;

    #[test]
    fn test_horizontal_reductions() {
        let v = SseKernel::load(&[3.0, -1.0, 7.5, 2.0]);
        assert_eq!(SseKernel::hsum(v), 11.5);
        assert_eq!(SseKernel::hmin(v), -1.0);
        assert_eq!(SseKernel::hmax(v), 7.5);
    }

    #[test]
    fn test_shuffle_matches_reference() {
        let a = [0.0, 1.0, 2.0, 3.0];
        let b = [10.0, 11.0, 12.0, 13.0];
        const M: i32 = shuffle_mask(2, 3, 0, 1);
        let sse = SseKernel::store(SseKernel::shuffle::<M>(SseKernel::load(&a), SseKernel::load(&b)));
        assert_eq!(sse, ScalarKernel::shuffle::<M>(a, b));
        assert_eq!(sse, [2.0, 3.0, 10.0, 11.0]);
    }

    #[test]
    fn test_refined_estimates() {
        for x in [0.001f32, 0.5, 1.0, 3.0, 1234.5, 1.0e20] {
            let r = SseKernel::store(SseKernel::rcp(SseKernel::splat(x)))[0];
            assert!((r * x - 1.0).abs() < 1e-5, "rcp({x}) = {r}");
            let s = SseKernel::store(SseKernel::rsqrt(SseKernel::splat(x)))[0];
            assert!((s * x.sqrt() - 1.0).abs() < 1e-5, "rsqrt({x}) = {s}");
        }
    }

    #[test]
    fn test_sign_mask_and_abs() {
        let v = SseKernel::load(&[-1.0, 0.0, -0.0, 2.0]);
        assert_eq!(SseKernel::sign_mask(v), 0b0101);
        assert_eq!(SseKernel::store(SseKernel::abs(v)), [1.0, 0.0, 0.0, 2.0]);
        assert_eq!(SseKernel::sign_mask(SseKernel::abs(v)), 0);
    }
}
