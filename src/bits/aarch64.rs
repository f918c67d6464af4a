//! AArch64 bit-manipulation kernels.
//!
//! - **popcount**: `CNT` counts bits per byte of a 64-bit NEON register and
//!   `ADDV` sums the eight byte counts.
//! - **clz**: the base ISA `CLZ` instruction, which returns the operand width
//!   for zero.
//! - **ctz**: `RBIT` followed by `CLZ`.
//! - **rotates**: `ROR`; a left rotation by `k` is a right rotation by `-k`.

use std::arch::aarch64::{vaddv_u8, vcnt_u8, vcreate_u8};
use std::arch::asm;

#[inline]
pub fn popcount32(x: u32) -> u32 {
    popcount64(x as u64)
}

#[inline]
pub fn popcount64(x: u64) -> u32 {
    unsafe { vaddv_u8(vcnt_u8(vcreate_u8(x))) as u32 }
}

#[inline]
pub fn clz32(x: u32) -> u32 {
    let out: u32;
    unsafe {
        asm!(
            "clz {out:w}, {x:w}",
            x = in(reg) x,
            out = lateout(reg) out,
            options(pure, nomem, nostack),
        );
    }
    out
}

#[inline]
pub fn clz64(x: u64) -> u32 {
    let out: u64;
    unsafe {
        asm!(
            "clz {out:x}, {x:x}",
            x = in(reg) x,
            out = lateout(reg) out,
            options(pure, nomem, nostack),
        );
    }
    out as u32
}

#[inline]
pub fn ctz32(x: u32) -> u32 {
    let mut v = x;
    unsafe {
        asm!(
            "rbit {v:w}, {v:w}",
            "clz {v:w}, {v:w}",
            v = inout(reg) v,
            options(pure, nomem, nostack),
        );
    }
    v
}

#[inline]
pub fn ctz64(x: u64) -> u32 {
    let mut v = x;
    unsafe {
        asm!(
            "rbit {v:x}, {v:x}",
            "clz {v:x}, {v:x}",
            v = inout(reg) v,
            options(pure, nomem, nostack),
        );
    }
    v as u32
}

#[inline]
pub fn lrotate32(x: u32, count: i32) -> u32 {
    x.rotate_right(count.wrapping_neg() as u32 & 31)
}

#[inline]
pub fn rrotate32(x: u32, count: i32) -> u32 {
    x.rotate_right(count as u32 & 31)
}

#[inline]
pub fn lrotate64(x: u64, count: i32) -> u64 {
    x.rotate_right(count.wrapping_neg() as u32 & 63)
}

#[inline]
pub fn rrotate64(x: u64, count: i32) -> u64 {
    x.rotate_right(count as u32 & 63)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::scalar;

    #[test]
    fn test_kernels_agree_with_reference() {
        let samples = [0u64, 1, 2, 0x80, u64::MAX, 0x8000_0000_0000_0000, 0x0000_0001_0000_0000];
        for &x in &samples {
            assert_eq!(popcount64(x), scalar::popcount64(x));
            assert_eq!(clz64(x), scalar::clz64(x));
            assert_eq!(ctz64(x), scalar::ctz64(x));
            let lo = x as u32;
            assert_eq!(popcount32(lo), scalar::popcount32(lo));
            assert_eq!(clz32(lo), scalar::clz32(lo));
            assert_eq!(ctz32(lo), scalar::ctz32(lo));
            for k in [-65, -1, 0, 1, 31, 32, 63, 64, 100] {
                assert_eq!(lrotate64(x, k), scalar::lrotate64(x, k));
                assert_eq!(lrotate32(lo, k), scalar::lrotate32(lo, k));
            }
        }
    }
}
