//! 256-bit 4x4 matrix kernels.
//!
//! A column-major 4x4 matrix is 16 contiguous floats, i.e. two `__m256`
//! registers of two columns each. The product broadcasts every column of the
//! left operand into both halves of a register and multiplies it by the
//! matching element of two right-hand columns at once, so the whole product
//! takes two iterations instead of four.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::traits::Columns;

#[inline(always)]
unsafe fn load_pair(m: &Columns, first: usize) -> __m256 {
    debug_assert!(first < 4 && first % 2 == 0);
    _mm256_loadu_ps(m.as_ptr().cast::<f32>().add(first * 4))
}

#[inline(always)]
unsafe fn store_pair(m: &mut Columns, first: usize, value: __m256) {
    debug_assert!(first < 4 && first % 2 == 0);
    _mm256_storeu_ps(m.as_mut_ptr().cast::<f32>().add(first * 4), value);
}

/// `a * b`, two result columns per iteration.
#[inline]
pub fn mat_mul(a: &Columns, b: &Columns) -> Columns {
    let mut out = [[0.0; 4]; 4];
    unsafe {
        let a0 = _mm256_broadcast_ps(&_mm_loadu_ps(a[0].as_ptr()));
        let a1 = _mm256_broadcast_ps(&_mm_loadu_ps(a[1].as_ptr()));
        let a2 = _mm256_broadcast_ps(&_mm_loadu_ps(a[2].as_ptr()));
        let a3 = _mm256_broadcast_ps(&_mm_loadu_ps(a[3].as_ptr()));

        for first in [0, 2] {
            let rhs = load_pair(b, first);
            let mut acc = _mm256_mul_ps(a0, _mm256_permute_ps::<0x00>(rhs));
            acc = _mm256_add_ps(acc, _mm256_mul_ps(a1, _mm256_permute_ps::<0x55>(rhs)));
            acc = _mm256_add_ps(acc, _mm256_mul_ps(a2, _mm256_permute_ps::<0xAA>(rhs)));
            acc = _mm256_add_ps(acc, _mm256_mul_ps(a3, _mm256_permute_ps::<0xFF>(rhs)));
            store_pair(&mut out, first, acc);
        }
    }
    out
}

/// Component-wise product in two 256-bit multiplies.
#[inline]
pub fn comp_mul(a: &Columns, b: &Columns) -> Columns {
    let mut out = [[0.0; 4]; 4];
    unsafe {
        for first in [0, 2] {
            let product = _mm256_mul_ps(load_pair(a, first), load_pair(b, first));
            store_pair(&mut out, first, product);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::scalar::ScalarKernel;
    use crate::simd::traits::Float4Kernel;

    fn sample(seed: f32) -> Columns {
        let mut m = [[0.0; 4]; 4];
        for (c, col) in m.iter_mut().enumerate() {
            for (r, x) in col.iter_mut().enumerate() {
                *x = seed + (c * 4 + r) as f32 * 0.5 - 3.0;
            }
        }
        m
    }

    #[test]
    fn test_mat_mul_matches_reference() {
        let a = sample(1.0);
        let b = sample(-2.0);
        assert_eq!(mat_mul(&a, &b), ScalarKernel::mat_mul(&a, &b));
    }

    #[test]
    fn test_comp_mul_matches_reference() {
        let a = sample(0.25);
        let b = sample(4.0);
        assert_eq!(comp_mul(&a, &b), ScalarKernel::comp_mul(&a, &b));
    }
}
