//! NEON elementary functions on `float32x4_t`.
//!
//! Same Cephes reductions and polynomials as the SSE2 backend, so both
//! accelerated paths agree to within rounding. AArch64 has a native
//! round-toward-minus-infinity (`vrndmq_f32`) and a bit-select (`vbslq_f32`),
//! which replace the SSE2 emulations. Both cover the whole `f32` range,
//! subnormal inputs and results included.

use std::arch::aarch64::*;

// ln(f32::MAX) rounded down, and ln(2^-150)
const EXP_HI: f32 = 88.722_83;
const EXP_LO: f32 = -103.972_08;
const LOG2EF: f32 = std::f32::consts::LOG2_E;

const LN2_HI: f32 = 0.693_359_4;
const LN2_LO: f32 = -2.121_944_4e-4;

const EXP_POLY: [f32; 6] = [
    1.987_569_1e-4,
    1.398_2e-3,
    8.333_452e-3,
    4.166_579_6e-2,
    1.666_666_5e-1,
    5.000_000_1e-1,
];

const SQRT_HALF: f32 = std::f32::consts::FRAC_1_SQRT_2;
const SUBNORMAL_SCALE: f32 = 8_388_608.0;

const LOG_POLY: [f32; 9] = [
    7.037_683_6e-2,
    -1.151_461e-1,
    1.167_699_9e-1,
    -1.242_014_1e-1,
    1.424_932_3e-1,
    -1.666_805_8e-1,
    2.000_071_5e-1,
    -2.499_999_4e-1,
    3.333_333_1e-1,
];

#[inline(always)]
unsafe fn polynomial(x: float32x4_t, coefficients: &[f32]) -> float32x4_t {
    let mut y = vdupq_n_f32(coefficients[0]);
    for &c in &coefficients[1..] {
        y = vmlaq_f32(vdupq_n_f32(c), y, x);
    }
    y
}

#[inline(always)]
unsafe fn is_nan(x: float32x4_t) -> uint32x4_t {
    vmvnq_u32(vceqq_f32(x, x))
}

/// Natural exponential: `+inf` above `ln(f32::MAX)`, zero below `ln(2^-150)`,
/// subnormal results in between are kept. NaN propagates.
#[inline(always)]
pub unsafe fn vexpq_f32(x: float32x4_t) -> float32x4_t {
    let input = x;
    let x = vmaxq_f32(vminq_f32(x, vdupq_n_f32(EXP_HI)), vdupq_n_f32(EXP_LO));

    let fx = vrndmq_f32(vmlaq_f32(vdupq_n_f32(0.5), x, vdupq_n_f32(LOG2EF)));

    let x = vmlsq_f32(x, fx, vdupq_n_f32(LN2_HI));
    let x = vmlsq_f32(x, fx, vdupq_n_f32(LN2_LO));

    let z = vmulq_f32(x, x);
    let y = polynomial(x, &EXP_POLY);
    let y = vaddq_f32(vmlaq_f32(x, y, z), vdupq_n_f32(1.0));

    // n in [-150, 128]: scale by two normal powers of two
    let n = vcvtq_s32_f32(fx);
    let n_lo = vshrq_n_s32::<1>(n);
    let n_hi = vsubq_s32(n, n_lo);
    let y = vmulq_f32(vmulq_f32(y, pow2i(n_lo)), pow2i(n_hi));

    let y = vbslq_f32(vcgtq_f32(input, vdupq_n_f32(EXP_HI)), vdupq_n_f32(f32::INFINITY), y);
    let y = vbslq_f32(vcltq_f32(input, vdupq_n_f32(EXP_LO)), vdupq_n_f32(0.0), y);
    vbslq_f32(is_nan(input), input, y)
}

#[inline(always)]
unsafe fn pow2i(n: int32x4_t) -> float32x4_t {
    vreinterpretq_f32_s32(vshlq_n_s32::<23>(vaddq_s32(n, vdupq_n_s32(0x7F))))
}

/// Natural logarithm: `-inf` at zero, NaN below zero, `+inf` at `+inf`.
#[inline(always)]
pub unsafe fn vlogq_f32(x: float32x4_t) -> float32x4_t {
    let input = x;

    let subnormal = vcltq_f32(x, vdupq_n_f32(f32::MIN_POSITIVE));
    let x = vbslq_f32(subnormal, vmulq_f32(x, vdupq_n_f32(SUBNORMAL_SCALE)), x);

    let bits = vreinterpretq_u32_f32(x);
    let exponent = vsubq_s32(
        vreinterpretq_s32_u32(vshrq_n_u32::<23>(bits)),
        vdupq_n_s32(0x7F),
    );
    let mantissa = vandq_u32(bits, vdupq_n_u32(!0x7F80_0000));
    let x = vreinterpretq_f32_u32(vorrq_u32(mantissa, vreinterpretq_u32_f32(vdupq_n_f32(0.5))));
    let e = vaddq_f32(vcvtq_f32_s32(exponent), vdupq_n_f32(1.0));
    let e = vsubq_f32(e, vbslq_f32(subnormal, vdupq_n_f32(23.0), vdupq_n_f32(0.0)));

    let below = vcltq_f32(x, vdupq_n_f32(SQRT_HALF));
    let one = vdupq_n_f32(1.0);
    let e = vsubq_f32(e, vbslq_f32(below, one, vdupq_n_f32(0.0)));
    let x = vsubq_f32(vaddq_f32(x, vbslq_f32(below, x, vdupq_n_f32(0.0))), one);

    let z = vmulq_f32(x, x);
    let y = vmulq_f32(vmulq_f32(polynomial(x, &LOG_POLY), x), z);
    let y = vmlaq_f32(y, e, vdupq_n_f32(LN2_LO));
    let y = vmlsq_f32(y, z, vdupq_n_f32(0.5));
    let result = vmlaq_f32(vaddq_f32(x, y), e, vdupq_n_f32(LN2_HI));

    let zero = vdupq_n_f32(0.0);
    let result = vbslq_f32(vceqq_f32(input, zero), vdupq_n_f32(f32::NEG_INFINITY), result);
    let result = vbslq_f32(vceqq_f32(input, vdupq_n_f32(f32::INFINITY)), input, result);
    let invalid = vorrq_u32(vcltq_f32(input, zero), is_nan(input));
    vbslq_f32(invalid, vdupq_n_f32(f32::NAN), result)
}
