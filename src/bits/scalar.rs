//! Portable bit-manipulation kernels.
//!
//! These are written with plain shifts and masks, without `count_ones` or the
//! other core builtins, so they serve both as the fallback on targets without
//! the relevant instructions and as the independent oracle the accelerated
//! variants are tested against.

/// Population count of a 32-bit pattern (SWAR reduction).
#[inline]
pub fn popcount32(x: u32) -> u32 {
    let x = x - ((x >> 1) & 0x5555_5555);
    let x = (x & 0x3333_3333) + ((x >> 2) & 0x3333_3333);
    let x = (x + (x >> 4)) & 0x0F0F_0F0F;
    x.wrapping_mul(0x0101_0101) >> 24
}

/// Population count of a 64-bit pattern (SWAR reduction).
#[inline]
pub fn popcount64(x: u64) -> u32 {
    let x = x - ((x >> 1) & 0x5555_5555_5555_5555);
    let x = (x & 0x3333_3333_3333_3333) + ((x >> 2) & 0x3333_3333_3333_3333);
    let x = (x + (x >> 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    (x.wrapping_mul(0x0101_0101_0101_0101) >> 56) as u32
}

/// Leading zero count; `clz32(0) == 32`.
///
/// Smears the highest set bit into every lower position, after which the
/// number of clear bits is the leading zero count.
#[inline]
pub fn clz32(x: u32) -> u32 {
    let mut x = x;
    x |= x >> 1;
    x |= x >> 2;
    x |= x >> 4;
    x |= x >> 8;
    x |= x >> 16;
    32 - popcount32(x)
}

/// Leading zero count; `clz64(0) == 64`.
#[inline]
pub fn clz64(x: u64) -> u32 {
    let mut x = x;
    x |= x >> 1;
    x |= x >> 2;
    x |= x >> 4;
    x |= x >> 8;
    x |= x >> 16;
    x |= x >> 32;
    64 - popcount64(x)
}

/// Trailing zero count; `ctz32(0) == 32`.
///
/// `!x & (x - 1)` keeps exactly the zeros below the lowest set bit. For zero
/// the mask is all ones, which yields the bit width without a branch.
#[inline]
pub fn ctz32(x: u32) -> u32 {
    popcount32(!x & x.wrapping_sub(1))
}

/// Trailing zero count; `ctz64(0) == 64`.
#[inline]
pub fn ctz64(x: u64) -> u32 {
    popcount64(!x & x.wrapping_sub(1))
}

/// Left rotation; the count is reduced modulo 32 by masking.
#[inline]
pub fn lrotate32(x: u32, count: i32) -> u32 {
    let k = (count as u32) & 31;
    (x << k) | (x >> ((32 - k) & 31))
}

/// Right rotation; the count is reduced modulo 32 by masking.
#[inline]
pub fn rrotate32(x: u32, count: i32) -> u32 {
    let k = (count as u32) & 31;
    (x >> k) | (x << ((32 - k) & 31))
}

/// Left rotation; the count is reduced modulo 64 by masking.
#[inline]
pub fn lrotate64(x: u64, count: i32) -> u64 {
    let k = (count as u32) & 63;
    (x << k) | (x >> ((64 - k) & 63))
}

/// Right rotation; the count is reduced modulo 64 by masking.
#[inline]
pub fn rrotate64(x: u64, count: i32) -> u64 {
    let k = (count as u32) & 63;
    (x >> k) | (x << ((64 - k) & 63))
}
