//! IEEE 754 binary16 ("half") storage type and conversion codec.
//!
//! [`Half`] stores the raw 16-bit pattern; arithmetic is done by widening to
//! `f32`, operating, and narrowing back, so every result is the correctly
//! rounded half of the `f32` result.
//!
//! # Backends
//!
//! The conversion itself has three interchangeable implementations, one of
//! which is compiled in:
//!
//! | Backend | Selected when | Narrowing | Widening |
//! |---------|---------------|-----------|----------|
//! | [`x86`] | `f16c` target feature | `vcvtps2ph` | `vcvtph2ps` |
//! | [`aarch64`] | AArch64, round-to-nearest | `fcvt h, s` | `fcvt s, h` |
//! | [`generic`] | otherwise | integer bit manipulation | integer bit manipulation |
//!
//! All three produce identical bit patterns; the hardware paths are tested
//! against [`generic`] exhaustively.
//!
//! # Rounding
//!
//! Narrowing rounds to nearest, ties to even. Building with the
//! `half-truncate` feature switches every backend to round toward zero, in
//! which case finite values beyond the half range saturate to [`Half::MAX`]
//! (or [`Half::MIN`]) instead of overflowing to infinity.
//!
//! # Example
//!
//! ```rust
//! use lanemath::half::{Half, half_to_single, single_to_half};
//!
//! let h = Half::from(1.5f32);
//! assert_eq!(h.to_bits(), 0x3E00);
//! assert_eq!(f32::from(h), 1.5);
//!
//! assert_eq!(single_to_half(-2.0), 0xC000);
//! assert_eq!(half_to_single(0x3C00), 1.0);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use crate::error::LaneError;

pub mod generic;
pub mod slice;

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), f16c))]
pub mod x86;

#[cfg(all(target_arch = "aarch64", neon, not(feature = "half-truncate")))]
pub mod aarch64;

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), f16c))]
use self::x86 as backend;

#[cfg(all(target_arch = "aarch64", neon, not(feature = "half-truncate")))]
use self::aarch64 as backend;

#[cfg(not(any(
    all(any(target_arch = "x86", target_arch = "x86_64"), f16c),
    all(target_arch = "aarch64", neon, not(feature = "half-truncate"))
)))]
use self::generic as backend;

pub use slice::{SimdHalf, SimdWiden};

/// Name of the compiled-in conversion backend.
pub const BACKEND: &str = if cfg!(all(any(target_arch = "x86", target_arch = "x86_64"), f16c)) {
    "f16c"
} else if cfg!(all(target_arch = "aarch64", neon, not(feature = "half-truncate"))) {
    "aarch64-fcvt"
} else {
    "generic"
};

/// Converts an `f32` to binary16 bits with the selected backend.
#[inline]
pub fn single_to_half(value: f32) -> u16 {
    backend::f32_to_f16(value)
}

/// Converts binary16 bits to an `f32` with the selected backend.
#[inline]
pub fn half_to_single(bits: u16) -> f32 {
    backend::f16_to_f32(bits)
}

/// A binary16 floating-point value.
#[derive(Clone, Copy, Default)]
#[repr(transparent)]
pub struct Half(u16);

impl Half {
    pub const ZERO: Half = Half(0x0000);
    pub const NEG_ZERO: Half = Half(0x8000);
    pub const ONE: Half = Half(0x3C00);
    pub const NEG_ONE: Half = Half(0xBC00);
    pub const INFINITY: Half = Half(0x7C00);
    pub const NEG_INFINITY: Half = Half(0xFC00);
    pub const NAN: Half = Half(0x7E00);
    /// Largest finite value, 65504.
    pub const MAX: Half = Half(0x7BFF);
    /// Smallest finite value, -65504.
    pub const MIN: Half = Half(0xFBFF);
    /// Smallest positive normal value, 2^-14.
    pub const MIN_POSITIVE: Half = Half(0x0400);
    /// Smallest positive subnormal value, 2^-24.
    pub const MIN_POSITIVE_SUBNORMAL: Half = Half(0x0001);
    /// Difference between 1.0 and the next larger value, 2^-10.
    pub const EPSILON: Half = Half(0x1400);

    #[inline]
    pub const fn from_bits(bits: u16) -> Half {
        Half(bits)
    }

    #[inline]
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn from_f32(value: f32) -> Half {
        Half(single_to_half(value))
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        half_to_single(self.0)
    }

    #[inline]
    pub const fn is_nan(self) -> bool {
        self.0 & 0x7C00 == 0x7C00 && self.0 & 0x03FF != 0
    }

    #[inline]
    pub const fn is_infinite(self) -> bool {
        self.0 & 0x7FFF == 0x7C00
    }

    #[inline]
    pub const fn is_finite(self) -> bool {
        self.0 & 0x7C00 != 0x7C00
    }

    #[inline]
    pub const fn is_subnormal(self) -> bool {
        self.0 & 0x7C00 == 0 && self.0 & 0x03FF != 0
    }

    #[inline]
    pub const fn is_sign_negative(self) -> bool {
        self.0 & 0x8000 != 0
    }

    #[inline]
    const fn is_zero(self) -> bool {
        self.0 & 0x7FFF == 0
    }
}

impl From<f32> for Half {
    #[inline]
    fn from(value: f32) -> Self {
        Half::from_f32(value)
    }
}

impl From<Half> for f32 {
    #[inline]
    fn from(value: Half) -> Self {
        value.to_f32()
    }
}

impl From<Half> for f64 {
    #[inline]
    fn from(value: Half) -> Self {
        value.to_f32() as f64
    }
}

impl PartialEq for Half {
    fn eq(&self, other: &Self) -> bool {
        if self.is_nan() || other.is_nan() {
            return false;
        }
        (self.is_zero() && other.is_zero()) || self.0 == other.0
    }
}

impl PartialOrd for Half {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        // Widening is exact, so comparing the f32 values is the IEEE order
        self.to_f32().partial_cmp(&other.to_f32())
    }
}

impl Neg for Half {
    type Output = Half;

    #[inline]
    fn neg(self) -> Half {
        Half(self.0 ^ 0x8000)
    }
}

macro_rules! impl_half_arith {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl $trait for Half {
            type Output = Half;

            #[inline]
            fn $method(self, rhs: Half) -> Half {
                Half::from_f32(self.to_f32() $op rhs.to_f32())
            }
        }

        impl $assign_trait for Half {
            #[inline]
            fn $assign_method(&mut self, rhs: Half) {
                *self = *self $op rhs;
            }
        }
    };
}

impl_half_arith!(Add, add, AddAssign, add_assign, +);
impl_half_arith!(Sub, sub, SubAssign, sub_assign, -);
impl_half_arith!(Mul, mul, MulAssign, mul_assign, *);
impl_half_arith!(Div, div, DivAssign, div_assign, /);

impl fmt::Debug for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_f32())
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f32(), f)
    }
}

impl fmt::LowerHex for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl FromStr for Half {
    type Err = LaneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f32 = s.trim().parse()?;
        Ok(Half::from_f32(value))
    }
}
