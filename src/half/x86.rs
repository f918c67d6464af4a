//! F16C hardware binary16 conversion (`vcvtps2ph` / `vcvtph2ps`).
//!
//! The rounding mode is an immediate of the narrowing instruction, so the
//! compile-time rounding choice of the crate maps directly onto it:
//! `_MM_FROUND_TO_NEAREST_INT` by default and `_MM_FROUND_TO_ZERO` with the
//! `half-truncate` feature.
//!
//! On macOS the scalar forms are replaced by a broadcast conversion followed
//! by a 16-bit lane extract, matching the instruction sequence Apple's
//! toolchain emits for `__fp16` stores. Both sequences produce the same bits.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(not(feature = "half-truncate"))]
const ROUNDING: i32 = _MM_FROUND_TO_NEAREST_INT;

#[cfg(feature = "half-truncate")]
const ROUNDING: i32 = _MM_FROUND_TO_ZERO;

/// Lane count of one conversion register.
pub const LANE_COUNT: usize = 4;

/// Narrows one `f32` to binary16 bits.
#[cfg(not(target_os = "macos"))]
#[inline]
pub fn f32_to_f16(value: f32) -> u16 {
    unsafe { _mm_cvtsi128_si32(_mm_cvtps_ph::<ROUNDING>(_mm_set_ss(value))) as u16 }
}

/// Narrows one `f32` to binary16 bits.
#[cfg(target_os = "macos")]
#[inline]
pub fn f32_to_f16(value: f32) -> u16 {
    unsafe { _mm_extract_epi16::<0>(_mm_cvtps_ph::<ROUNDING>(_mm_set1_ps(value))) as u16 }
}

/// Widens binary16 bits to an `f32`.
#[cfg(not(target_os = "macos"))]
#[inline]
pub fn f16_to_f32(bits: u16) -> f32 {
    unsafe { _mm_cvtss_f32(_mm_cvtph_ps(_mm_cvtsi32_si128(bits as i32))) }
}

/// Widens binary16 bits to an `f32`.
#[cfg(target_os = "macos")]
#[inline]
pub fn f16_to_f32(bits: u16) -> f32 {
    unsafe { _mm_cvtss_f32(_mm_cvtph_ps(_mm_set1_epi16(bits as i16))) }
}

/// Narrows four lanes at once.
#[inline]
pub fn f32x4_to_f16x4(values: &[f32; LANE_COUNT]) -> [u16; LANE_COUNT] {
    let mut out = [0u16; LANE_COUNT];
    unsafe {
        let packed = _mm_cvtps_ph::<ROUNDING>(_mm_loadu_ps(values.as_ptr()));
        _mm_storel_epi64(out.as_mut_ptr() as *mut __m128i, packed);
    }
    out
}

/// Widens four lanes at once.
#[inline]
pub fn f16x4_to_f32x4(bits: &[u16; LANE_COUNT]) -> [f32; LANE_COUNT] {
    let mut out = [0f32; LANE_COUNT];
    unsafe {
        let packed = _mm_loadl_epi64(bits.as_ptr() as *const __m128i);
        _mm_storeu_ps(out.as_mut_ptr(), _mm_cvtph_ps(packed));
    }
    out
}
