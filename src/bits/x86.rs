//! x86_64 bit-manipulation kernels.
//!
//! Each group is compiled only when the matching target feature is enabled
//! for the build:
//!
//! | Kernel      | Instruction | Target feature |
//! |-------------|-------------|----------------|
//! | `popcount*` | `POPCNT`    | `popcnt`       |
//! | `clz*`      | `LZCNT`     | `lzcnt`        |
//! | `ctz*`      | `TZCNT`     | `bmi1`         |
//! | `*rotate*`  | `ROL`/`ROR` | baseline       |
//!
//! `LZCNT` and `TZCNT` are defined for zero (they return the operand width),
//! unlike the older `BSR`/`BSF`, so no zero test is needed.

#[cfg(any(popcnt, lzcnt, bmi1))]
use std::arch::x86_64::*;

#[cfg(popcnt)]
#[inline]
pub fn popcount32(x: u32) -> u32 {
    unsafe { _popcnt32(x as i32) as u32 }
}

#[cfg(popcnt)]
#[inline]
pub fn popcount64(x: u64) -> u32 {
    unsafe { _popcnt64(x as i64) as u32 }
}

#[cfg(lzcnt)]
#[inline]
pub fn clz32(x: u32) -> u32 {
    unsafe { _lzcnt_u32(x) }
}

#[cfg(lzcnt)]
#[inline]
pub fn clz64(x: u64) -> u32 {
    unsafe { _lzcnt_u64(x) as u32 }
}

#[cfg(bmi1)]
#[inline]
pub fn ctz32(x: u32) -> u32 {
    unsafe { _tzcnt_u32(x) }
}

#[cfg(bmi1)]
#[inline]
pub fn ctz64(x: u64) -> u32 {
    unsafe { _tzcnt_u64(x) as u32 }
}

// `rotate_left`/`rotate_right` lower to ROL/ROR, which mask the count in
// hardware exactly like the reference kernels do.

#[inline]
pub fn lrotate32(x: u32, count: i32) -> u32 {
    x.rotate_left(count as u32 & 31)
}

#[inline]
pub fn rrotate32(x: u32, count: i32) -> u32 {
    x.rotate_right(count as u32 & 31)
}

#[inline]
pub fn lrotate64(x: u64, count: i32) -> u64 {
    x.rotate_left(count as u32 & 63)
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
    fn test_rotates_agree_with_reference() {
        let x = 0x0F1E_2D3C_4B5A_6978_u64;
        for k in -130..130 {
            assert_eq!(lrotate64(x, k), scalar::lrotate64(x, k));
            assert_eq!(rrotate64(x, k), scalar::rrotate64(x, k));
            assert_eq!(lrotate32(x as u32, k), scalar::lrotate32(x as u32, k));
            assert_eq!(rrotate32(x as u32, k), scalar::rrotate32(x as u32, k));
        }
    }

    #[cfg(popcnt)]
    #[test]
    fn test_popcnt_agrees_with_reference() {
        for x in [0u64, 1, u64::MAX, 0x8000_0000_0000_0001, 0xAAAA_5555_0000_FFFF] {
            assert_eq!(popcount64(x), scalar::popcount64(x));
            assert_eq!(popcount32(x as u32), scalar::popcount32(x as u32));
        }
    }

    #[cfg(lzcnt)]
    #[test]
    fn test_lzcnt_of_zero() {
        assert_eq!(clz32(0), 32);
        assert_eq!(clz64(0), 64);
    }

    #[cfg(bmi1)]
    #[test]
    fn test_tzcnt_of_zero() {
        assert_eq!(ctz32(0), 32);
        assert_eq!(ctz64(0), 64);
    }
}
