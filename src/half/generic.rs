//! Portable binary16 codec using integer bit manipulation.
//!
//! This is the reference every hardware path is checked against, and the
//! implementation used on targets without a conversion instruction.
//!
//! # Narrowing (`f32` -> binary16)
//!
//! The exponent is rebiased from 127 to 15. Results that land below the
//! smallest normal half are shifted into a subnormal mantissa; results above
//! the largest finite half overflow. Two rounding modes exist:
//!
//! | Mode | Ties | Overflow of finite input |
//! |------|------|--------------------------|
//! | [`f32_to_f16_nearest`] | to even | +/-infinity |
//! | [`f32_to_f16_truncate`] | n/a (toward zero) | +/-`0x7BFF` (largest finite) |
//!
//! NaNs keep their sign and the top ten payload bits and always come out
//! quiet (`0x7E00` set), which is what `vcvtps2ph` and AArch64 `fcvt` do.
//!
//! # Widening (binary16 -> `f32`)
//!
//! Exact for every non-NaN pattern: subnormal halves are normalized into the
//! wider exponent range. NaNs are quieted (`0x7FC0_0000` set) and keep their
//! payload in the top mantissa bits.

const F32_SIGN: u32 = 0x8000_0000;
const F32_EXP: u32 = 0x7F80_0000;
const F32_MAN: u32 = 0x007F_FFFF;

const F16_EXP: u32 = 0x7C00;
const F16_MAN: u32 = 0x03FF;
const F16_QUIET: u32 = 0x0200;
const F16_MAX_FINITE: u32 = 0x7BFF;

/// Converts an `f32` to binary16 bits, rounding to nearest, ties to even.
#[inline]
pub fn f32_to_f16_nearest(value: f32) -> u16 {
    let x = value.to_bits();
    let sign = (x & F32_SIGN) >> 16;
    let exp = x & F32_EXP;
    let man = x & F32_MAN;

    // Infinity or NaN
    if exp == F32_EXP {
        let quiet = if man == 0 { 0 } else { F16_QUIET };
        return (sign | F16_EXP | quiet | (man >> 13)) as u16;
    }

    let half_exp = (exp >> 23) as i32 - 127 + 15;

    if half_exp >= 0x1F {
        return (sign | F16_EXP) as u16;
    }

    if half_exp <= 0 {
        // Too small even for the smallest subnormal once rounded
        if half_exp < -10 {
            return sign as u16;
        }

        let man = man | 0x0080_0000;
        let shift = (14 - half_exp) as u32;
        let half_man = man >> shift;
        let round_bit = 1u32 << (shift - 1);

        // Round up when above the halfway point, or exactly halfway with an odd result
        let round_up = (man & round_bit) != 0 && (man & (3 * round_bit - 1)) != 0;
        return (sign | (half_man + round_up as u32)) as u16;
    }

    let bits = sign | ((half_exp as u32) << 10) | (man >> 13);
    let round_bit = 0x0000_1000;
    let round_up = (man & round_bit) != 0 && (man & (3 * round_bit - 1)) != 0;

    // A mantissa carry ripples into the exponent, up to infinity, which is the
    // correctly rounded result
    (bits + round_up as u32) as u16
}

/// Converts an `f32` to binary16 bits, rounding toward zero.
#[inline]
pub fn f32_to_f16_truncate(value: f32) -> u16 {
    let x = value.to_bits();
    let sign = (x & F32_SIGN) >> 16;
    let exp = x & F32_EXP;
    let man = x & F32_MAN;

    if exp == F32_EXP {
        let quiet = if man == 0 { 0 } else { F16_QUIET };
        return (sign | F16_EXP | quiet | (man >> 13)) as u16;
    }

    let half_exp = (exp >> 23) as i32 - 127 + 15;

    if half_exp >= 0x1F {
        return (sign | F16_MAX_FINITE) as u16;
    }

    if half_exp <= 0 {
        if half_exp < -10 {
            return sign as u16;
        }
        let man = man | 0x0080_0000;
        return (sign | (man >> (14 - half_exp) as u32)) as u16;
    }

    (sign | ((half_exp as u32) << 10) | (man >> 13)) as u16
}

/// Converts an `f32` to binary16 bits with the crate's compile-time rounding mode.
#[inline]
pub fn f32_to_f16(value: f32) -> u16 {
    #[cfg(not(feature = "half-truncate"))]
    {
        f32_to_f16_nearest(value)
    }
    #[cfg(feature = "half-truncate")]
    {
        f32_to_f16_truncate(value)
    }
}

/// Converts binary16 bits to an `f32`.
#[inline]
pub fn f16_to_f32(bits: u16) -> f32 {
    let h = bits as u32;
    let sign = (h & 0x8000) << 16;
    let exp = h & F16_EXP;
    let man = h & F16_MAN;

    // Signed zero
    if h & 0x7FFF == 0 {
        return f32::from_bits(sign);
    }

    if exp == F16_EXP {
        if man == 0 {
            return f32::from_bits(sign | F32_EXP);
        }
        return f32::from_bits(sign | 0x7FC0_0000 | (man << 13));
    }

    if exp == 0 {
        // Subnormal: value = man * 2^-24. Normalize so the leading one becomes
        // the implicit bit of the wider format.
        let e = man.leading_zeros() - 22;
        let exp = (127 - 15 - e) << 23;
        let man = (man << (14 + e)) & F32_MAN;
        return f32::from_bits(sign | exp | man);
    }

    f32::from_bits(sign | (((exp >> 10) + 127 - 15) << 23) | (man << 13))
}
