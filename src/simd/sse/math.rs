//! SSE2 elementary functions on `__m128`.
//!
//! `exp` and `log` follow the Cephes single-precision algorithms: range
//! reduction by powers of two, `ln(2)` split into a coarse and a fine part so
//! the reduction is exact, and a minimax polynomial on the reduced argument.
//! Maximum relative error is below 2e-7 wherever the result is a normal
//! float; subnormal results and inputs are within one unit in the last place.
//!
//! SSE2 has no blend or round instruction, so lane selection is done with
//! `and`/`andnot`/`or` and `floor` with a truncating conversion plus fix-up.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

// largest input with a finite result, ln(f32::MAX) rounded down
const EXP_HI: f32 = 88.722_83;
// below this the result rounds to zero, ln(2^-150)
const EXP_LO: f32 = -103.972_08;
const LOG2EF: f32 = std::f32::consts::LOG2_E;

// ln(2) = LN2_HI + LN2_LO, with LN2_HI exactly representable in 9 bits
const LN2_HI: f32 = 0.693_359_4;
const LN2_LO: f32 = -2.121_944_4e-4;

const EXP_P0: f32 = 1.987_569_1e-4;
const EXP_P1: f32 = 1.398_2e-3;
const EXP_P2: f32 = 8.333_452e-3;
const EXP_P3: f32 = 4.166_579_6e-2;
const EXP_P4: f32 = 1.666_666_5e-1;
const EXP_P5: f32 = 5.000_000_1e-1;

const SQRT_HALF: f32 = std::f32::consts::FRAC_1_SQRT_2;

// 2^23, lifts a subnormal into the normal range
const SUBNORMAL_SCALE: f32 = 8_388_608.0;

const LOG_P0: f32 = 7.037_683_6e-2;
const LOG_P1: f32 = -1.151_461e-1;
const LOG_P2: f32 = 1.167_699_9e-1;
const LOG_P3: f32 = -1.242_014_1e-1;
const LOG_P4: f32 = 1.424_932_3e-1;
const LOG_P5: f32 = -1.666_805_8e-1;
const LOG_P6: f32 = 2.000_071_5e-1;
const LOG_P7: f32 = -2.499_999_4e-1;
const LOG_P8: f32 = 3.333_333_1e-1;

/// `mask ? a : b` per lane.
#[inline(always)]
pub unsafe fn _mm_select_ps(mask: __m128, a: __m128, b: __m128) -> __m128 {
    _mm_or_ps(_mm_and_ps(mask, a), _mm_andnot_ps(mask, b))
}

/// Lane-wise floor.
///
/// Lanes with magnitude at or above 2^23 are already integral and pass
/// through unchanged, which also covers infinities and NaN.
#[inline(always)]
pub unsafe fn _mm_floor_ps_sse2(x: __m128) -> __m128 {
    let truncated = _mm_cvtepi32_ps(_mm_cvttps_epi32(x));
    // truncation rounds negative fractions up
    let fix = _mm_and_ps(_mm_cmpgt_ps(truncated, x), _mm_set1_ps(1.0));
    let floored = _mm_sub_ps(truncated, fix);

    let magnitude = _mm_andnot_ps(_mm_set1_ps(-0.0), x);
    let small = _mm_cmplt_ps(magnitude, _mm_set1_ps(8_388_608.0));
    _mm_select_ps(small, floored, x)
}

/// Horner evaluation of `c[0] * x^(n-1) + ... + c[n-1]`.
#[inline(always)]
unsafe fn polynomial(x: __m128, coefficients: &[f32]) -> __m128 {
    let mut y = _mm_set1_ps(coefficients[0]);
    for &c in &coefficients[1..] {
        y = _mm_add_ps(_mm_mul_ps(y, x), _mm_set1_ps(c));
    }
    y
}

/// Natural exponential.
///
/// Inputs above `ln(f32::MAX)` give `+inf`, inputs below `ln(2^-150)` give
/// zero, and results in between are finite, including the subnormal range.
/// NaN lanes propagate.
#[inline(always)]
pub unsafe fn _mm_exp_ps(x: __m128) -> __m128 {
    let input = x;
    let x = _mm_max_ps(_mm_min_ps(x, _mm_set1_ps(EXP_HI)), _mm_set1_ps(EXP_LO));

    // n = floor(x / ln2 + 0.5)
    let fx = _mm_add_ps(_mm_mul_ps(x, _mm_set1_ps(LOG2EF)), _mm_set1_ps(0.5));
    let fx = _mm_floor_ps_sse2(fx);

    // r = x - n * ln2, in two steps
    let x = _mm_sub_ps(x, _mm_mul_ps(fx, _mm_set1_ps(LN2_HI)));
    let x = _mm_sub_ps(x, _mm_mul_ps(fx, _mm_set1_ps(LN2_LO)));

    let z = _mm_mul_ps(x, x);
    let y = polynomial(x, &[EXP_P0, EXP_P1, EXP_P2, EXP_P3, EXP_P4, EXP_P5]);
    let y = _mm_add_ps(_mm_add_ps(_mm_mul_ps(y, z), x), _mm_set1_ps(1.0));

    // n lies in [-150, 128], outside the exponent field, so 2^n is applied
    // as two normal factors; only the second product rounds
    let n = _mm_cvttps_epi32(fx);
    let n_lo = _mm_srai_epi32::<1>(n);
    let n_hi = _mm_sub_epi32(n, n_lo);
    let y = _mm_mul_ps(_mm_mul_ps(y, pow2i(n_lo)), pow2i(n_hi));

    let y = _mm_select_ps(
        _mm_cmpgt_ps(input, _mm_set1_ps(EXP_HI)),
        _mm_set1_ps(f32::INFINITY),
        y,
    );
    let y = _mm_andnot_ps(_mm_cmplt_ps(input, _mm_set1_ps(EXP_LO)), y);
    _mm_select_ps(_mm_cmpunord_ps(input, input), input, y)
}

/// `2^n` for `n` in the normal exponent range.
#[inline(always)]
unsafe fn pow2i(n: __m128i) -> __m128 {
    _mm_castsi128_ps(_mm_slli_epi32::<23>(_mm_add_epi32(n, _mm_set1_epi32(0x7F))))
}

/// Natural logarithm.
///
/// `log(0) = -inf`, `log(+inf) = +inf`, NaN for negative lanes and NaN.
#[inline(always)]
pub unsafe fn _mm_log_ps(x: __m128) -> __m128 {
    let input = x;

    // subnormals are scaled into the normal range and the exponent corrected
    let subnormal = _mm_cmplt_ps(x, _mm_set1_ps(f32::MIN_POSITIVE));
    let x = _mm_select_ps(subnormal, _mm_mul_ps(x, _mm_set1_ps(SUBNORMAL_SCALE)), x);
    let correction = _mm_and_ps(subnormal, _mm_set1_ps(23.0));

    // split into mantissa in [0.5, 1) and exponent
    let bits = _mm_castps_si128(x);
    let exponent = _mm_sub_epi32(_mm_srli_epi32::<23>(bits), _mm_set1_epi32(0x7F));
    let mantissa = _mm_and_ps(x, _mm_castsi128_ps(_mm_set1_epi32(!0x7F80_0000)));
    let x = _mm_or_ps(mantissa, _mm_set1_ps(0.5));
    let e = _mm_add_ps(_mm_cvtepi32_ps(exponent), _mm_set1_ps(1.0));
    let e = _mm_sub_ps(e, correction);

    // below sqrt(1/2): e -= 1, x = 2x - 1; otherwise x = x - 1
    let below = _mm_cmplt_ps(x, _mm_set1_ps(SQRT_HALF));
    let tmp = _mm_and_ps(x, below);
    let x = _mm_sub_ps(x, _mm_set1_ps(1.0));
    let e = _mm_sub_ps(e, _mm_and_ps(_mm_set1_ps(1.0), below));
    let x = _mm_add_ps(x, tmp);

    let z = _mm_mul_ps(x, x);
    let y = polynomial(
        x,
        &[
            LOG_P0, LOG_P1, LOG_P2, LOG_P3, LOG_P4, LOG_P5, LOG_P6, LOG_P7, LOG_P8,
        ],
    );
    let y = _mm_mul_ps(_mm_mul_ps(y, x), z);

    let y = _mm_add_ps(y, _mm_mul_ps(e, _mm_set1_ps(LN2_LO)));
    let y = _mm_sub_ps(y, _mm_mul_ps(z, _mm_set1_ps(0.5)));
    let x = _mm_add_ps(x, y);
    let result = _mm_add_ps(x, _mm_mul_ps(e, _mm_set1_ps(LN2_HI)));

    // special lanes
    let zero = _mm_setzero_ps();
    let result = _mm_select_ps(_mm_cmpeq_ps(input, zero), _mm_set1_ps(f32::NEG_INFINITY), result);
    let result = _mm_select_ps(
        _mm_cmpeq_ps(input, _mm_set1_ps(f32::INFINITY)),
        input,
        result,
    );
    let invalid = _mm_or_ps(_mm_cmplt_ps(input, zero), _mm_cmpunord_ps(input, input));
    _mm_select_ps(invalid, _mm_set1_ps(f32::NAN), result)
}
