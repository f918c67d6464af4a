//! Batch binary16 conversion over slices.
//!
//! Each trait offers the usual three variants:
//!
//! - `simd_*`: the selected backend, four lanes per instruction when F16C
//!   is available.
//! - `par_simd_*`: the same kernel over `rayon` chunks for large inputs.
//! - `scalar_*`: the portable codec, used as the reference in tests.

use rayon::prelude::*;

use super::{backend, generic, Half};
use crate::{PARALLEL_CHUNK_SIZE, PARALLEL_SIMD_THRESHOLD};

/// Narrowing conversion of an `f32` slice.
pub trait SimdHalf {
    type Output;

    fn simd_to_half(self) -> Self::Output;
    fn par_simd_to_half(self) -> Self::Output;
    fn scalar_to_half(self) -> Self::Output;
}

/// Widening conversion of a [`Half`] slice.
pub trait SimdWiden {
    type Output;

    fn simd_to_f32(self) -> Self::Output;
    fn par_simd_to_f32(self) -> Self::Output;
    fn scalar_to_f32(self) -> Self::Output;
}

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), f16c))]
#[inline]
fn narrow_block(src: &[f32], dst: &mut [Half]) {
    debug_assert_eq!(src.len(), dst.len());
    let step = backend::LANE_COUNT;

    let mut src_chunks = src.chunks_exact(step);
    let mut dst_chunks = dst.chunks_exact_mut(step);
    for (s, d) in (&mut src_chunks).zip(&mut dst_chunks) {
        let mut lanes = [0f32; 4];
        lanes.copy_from_slice(s);
        let packed = backend::f32x4_to_f16x4(&lanes);
        for (out, bits) in d.iter_mut().zip(packed) {
            *out = Half::from_bits(bits);
        }
    }
    for (out, &v) in dst_chunks
        .into_remainder()
        .iter_mut()
        .zip(src_chunks.remainder())
    {
        *out = Half::from_bits(backend::f32_to_f16(v));
    }
}

#[cfg(not(all(any(target_arch = "x86", target_arch = "x86_64"), f16c)))]
#[inline]
fn narrow_block(src: &[f32], dst: &mut [Half]) {
    debug_assert_eq!(src.len(), dst.len());
    for (out, &v) in dst.iter_mut().zip(src) {
        *out = Half::from_bits(backend::f32_to_f16(v));
    }
}

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), f16c))]
#[inline]
fn widen_block(src: &[Half], dst: &mut [f32]) {
    debug_assert_eq!(src.len(), dst.len());
    let step = backend::LANE_COUNT;

    let mut src_chunks = src.chunks_exact(step);
    let mut dst_chunks = dst.chunks_exact_mut(step);
    for (s, d) in (&mut src_chunks).zip(&mut dst_chunks) {
        let bits = [s[0].to_bits(), s[1].to_bits(), s[2].to_bits(), s[3].to_bits()];
        d.copy_from_slice(&backend::f16x4_to_f32x4(&bits));
    }
    for (out, h) in dst_chunks
        .into_remainder()
        .iter_mut()
        .zip(src_chunks.remainder())
    {
        *out = backend::f16_to_f32(h.to_bits());
    }
}

#[cfg(not(all(any(target_arch = "x86", target_arch = "x86_64"), f16c)))]
#[inline]
fn widen_block(src: &[Half], dst: &mut [f32]) {
    debug_assert_eq!(src.len(), dst.len());
    for (out, h) in dst.iter_mut().zip(src) {
        *out = backend::f16_to_f32(h.to_bits());
    }
}

impl SimdHalf for &[f32] {
    type Output = Vec<Half>;

    fn simd_to_half(self) -> Vec<Half> {
        let mut out = vec![Half::ZERO; self.len()];
        narrow_block(self, &mut out);
        out
    }

    fn par_simd_to_half(self) -> Vec<Half> {
        if self.len() <= PARALLEL_SIMD_THRESHOLD {
            return self.simd_to_half();
        }

        let mut out = vec![Half::ZERO; self.len()];
        out.par_chunks_mut(PARALLEL_CHUNK_SIZE)
            .zip(self.par_chunks(PARALLEL_CHUNK_SIZE))
            .for_each(|(dst, src)| narrow_block(src, dst));
        out
    }

    fn scalar_to_half(self) -> Vec<Half> {
        self.iter()
            .map(|&v| Half::from_bits(generic::f32_to_f16(v)))
            .collect()
    }
}

impl SimdWiden for &[Half] {
    type Output = Vec<f32>;

    fn simd_to_f32(self) -> Vec<f32> {
        let mut out = vec![0.0; self.len()];
        widen_block(self, &mut out);
        out
    }

    fn par_simd_to_f32(self) -> Vec<f32> {
        if self.len() <= PARALLEL_SIMD_THRESHOLD {
            return self.simd_to_f32();
        }

        let mut out = vec![0.0; self.len()];
        out.par_chunks_mut(PARALLEL_CHUNK_SIZE)
            .zip(self.par_chunks(PARALLEL_CHUNK_SIZE))
            .for_each(|(dst, src)| widen_block(src, dst));
        out
    }

    fn scalar_to_f32(self) -> Vec<f32> {
        self.iter().map(|h| generic::f16_to_f32(h.to_bits())).collect()
    }
}
