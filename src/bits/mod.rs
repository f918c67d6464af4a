//! Bit-manipulation kernels: population count, leading/trailing zero count
//! and rotations for `i32`, `u32`, `i64` and `u64`.
//!
//! Every operation has a portable implementation in [`scalar`] and, where the
//! target enables the instruction, a platform variant (`x86` on x86_64 with
//! `popcnt`/`lzcnt`/`bmi1`, `aarch64` on AArch64). Exactly one variant per
//! operation is compiled into the crate; the choice is made by `build.rs`
//! from the target features of the build and can be forced to the portable
//! path with the `force-scalar` feature.
//!
//! # Contract
//!
//! - All variants return identical results for every input.
//! - Signed inputs are processed as their two's-complement bit pattern.
//! - `clz`/`ctz` of zero return the bit width of the type.
//! - Rotation counts are reduced modulo the bit width by masking, so negative
//!   and over-wide counts are well defined: `lrotate(x, -1) == rrotate(x, 1)`.
//!
//! # Example
//!
//! ```rust
//! use lanemath::bits::{self, BitOps};
//!
//! assert_eq!(bits::popcount_u32(0xFFFF_FFFF), 32);
//! assert_eq!(0u32.clz(), 32);
//! assert_eq!((-1i64).popcount(), 64);
//! assert_eq!(bits::lrotate_u32(0x8000_0000, 1), 1);
//! ```

pub mod scalar;

#[cfg(all(target_arch = "x86_64", sse))]
pub mod x86;

#[cfg(all(target_arch = "aarch64", neon))]
pub mod aarch64;

// Per-operation selection. Each block below picks one implementation.

#[cfg(all(target_arch = "x86_64", sse, popcnt))]
use x86::{popcount32, popcount64};
#[cfg(all(target_arch = "aarch64", neon))]
use aarch64::{popcount32, popcount64};
#[cfg(not(any(all(target_arch = "x86_64", sse, popcnt), all(target_arch = "aarch64", neon))))]
use scalar::{popcount32, popcount64};

#[cfg(all(target_arch = "x86_64", sse, lzcnt))]
use x86::{clz32, clz64};
#[cfg(all(target_arch = "aarch64", neon))]
use aarch64::{clz32, clz64};
#[cfg(not(any(all(target_arch = "x86_64", sse, lzcnt), all(target_arch = "aarch64", neon))))]
use scalar::{clz32, clz64};

#[cfg(all(target_arch = "x86_64", sse, bmi1))]
use x86::{ctz32, ctz64};
#[cfg(all(target_arch = "aarch64", neon))]
use aarch64::{ctz32, ctz64};
#[cfg(not(any(all(target_arch = "x86_64", sse, bmi1), all(target_arch = "aarch64", neon))))]
use scalar::{ctz32, ctz64};

#[cfg(all(target_arch = "x86_64", sse))]
use x86::{lrotate32, lrotate64, rrotate32, rrotate64};
#[cfg(all(target_arch = "aarch64", neon))]
use aarch64::{lrotate32, lrotate64, rrotate32, rrotate64};
#[cfg(not(any(all(target_arch = "x86_64", sse), all(target_arch = "aarch64", neon))))]
use scalar::{lrotate32, lrotate64, rrotate32, rrotate64};

/// Name of the implementation selected for `popcount`.
pub const POPCOUNT_BACKEND: &str = if cfg!(all(target_arch = "x86_64", sse, popcnt)) {
    "x86_64-popcnt"
} else if cfg!(all(target_arch = "aarch64", neon)) {
    "aarch64-cnt"
} else {
    "scalar"
};

/// Name of the implementation selected for `clz`.
pub const CLZ_BACKEND: &str = if cfg!(all(target_arch = "x86_64", sse, lzcnt)) {
    "x86_64-lzcnt"
} else if cfg!(all(target_arch = "aarch64", neon)) {
    "aarch64-clz"
} else {
    "scalar"
};

/// Name of the implementation selected for `ctz`.
pub const CTZ_BACKEND: &str = if cfg!(all(target_arch = "x86_64", sse, bmi1)) {
    "x86_64-tzcnt"
} else if cfg!(all(target_arch = "aarch64", neon)) {
    "aarch64-rbit-clz"
} else {
    "scalar"
};

/// Name of the implementation selected for the rotations.
pub const ROTATE_BACKEND: &str = if cfg!(all(target_arch = "x86_64", sse)) {
    "x86_64-rol"
} else if cfg!(all(target_arch = "aarch64", neon)) {
    "aarch64-ror"
} else {
    "scalar"
};

/// Bit-level operations shared by the 32 and 64-bit integer types.
pub trait BitOps: Copy {
    /// Width of the type in bits.
    const BITS: u32;

    /// Number of set bits.
    fn popcount(self) -> u32;

    /// Number of zero bits above the highest set bit; `BITS` for zero.
    fn clz(self) -> u32;

    /// Number of zero bits below the lowest set bit; `BITS` for zero.
    fn ctz(self) -> u32;

    /// Rotates left by `count` modulo `BITS`.
    fn lrotate(self, count: i32) -> Self;

    /// Rotates right by `count` modulo `BITS`.
    fn rrotate(self, count: i32) -> Self;
}

macro_rules! impl_bit_ops {
    ($t:ty, $u:ty, $bits:expr, $pop:ident, $clz:ident, $ctz:ident, $rotl:ident, $rotr:ident) => {
        impl BitOps for $t {
            const BITS: u32 = $bits;

            #[inline(always)]
            fn popcount(self) -> u32 {
                $pop(self as $u)
            }

            #[inline(always)]
            fn clz(self) -> u32 {
                $clz(self as $u)
            }

            #[inline(always)]
            fn ctz(self) -> u32 {
                $ctz(self as $u)
            }

            #[inline(always)]
            fn lrotate(self, count: i32) -> Self {
                $rotl(self as $u, count) as $t
            }

            #[inline(always)]
            fn rrotate(self, count: i32) -> Self {
                $rotr(self as $u, count) as $t
            }
        }
    };
}

impl_bit_ops!(u32, u32, 32, popcount32, clz32, ctz32, lrotate32, rrotate32);
impl_bit_ops!(i32, u32, 32, popcount32, clz32, ctz32, lrotate32, rrotate32);
impl_bit_ops!(u64, u64, 64, popcount64, clz64, ctz64, lrotate64, rrotate64);
impl_bit_ops!(i64, u64, 64, popcount64, clz64, ctz64, lrotate64, rrotate64);

macro_rules! free_fns {
    ($t:ty => $pop:ident, $clz:ident, $ctz:ident, $rotl:ident, $rotr:ident) => {
        #[doc = concat!("Population count of a `", stringify!($t), "`.")]
        #[inline]
        pub fn $pop(x: $t) -> u32 {
            x.popcount()
        }

        #[doc = concat!("Leading zero count of a `", stringify!($t), "`, the bit width for zero.")]
        #[inline]
        pub fn $clz(x: $t) -> u32 {
            x.clz()
        }

        #[doc = concat!("Trailing zero count of a `", stringify!($t), "`, the bit width for zero.")]
        #[inline]
        pub fn $ctz(x: $t) -> u32 {
            x.ctz()
        }

        #[doc = concat!("Left rotation of a `", stringify!($t), "`, count taken modulo the bit width.")]
        #[inline]
        pub fn $rotl(x: $t, count: i32) -> $t {
            x.lrotate(count)
        }

        #[doc = concat!("Right rotation of a `", stringify!($t), "`, count taken modulo the bit width.")]
        #[inline]
        pub fn $rotr(x: $t, count: i32) -> $t {
            x.rrotate(count)
        }
    };
}

free_fns!(u32 => popcount_u32, clz_u32, ctz_u32, lrotate_u32, rrotate_u32);
free_fns!(i32 => popcount_i32, clz_i32, ctz_i32, lrotate_i32, rrotate_i32);
free_fns!(u64 => popcount_u64, clz_u64, ctz_u64, lrotate_u64, rrotate_u64);
free_fns!(i64 => popcount_i64, clz_i64, ctz_i64, lrotate_i64, rrotate_i64);
