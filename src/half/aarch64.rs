//! AArch64 binary16 conversion via the base-ISA `FCVT` instruction.
//!
//! `FCVT Hd, Sn` rounds according to FPCR, which is round-to-nearest-even in
//! every Rust program, so this path is only selected for the default rounding
//! mode. With `half-truncate` the crate uses the portable codec instead.

use std::arch::asm;

/// Narrows one `f32` to binary16 bits.
#[inline]
pub fn f32_to_f16(value: f32) -> u16 {
    let out: i16;
    unsafe {
        asm!(
            "fcvt {out:h}, {inp:s}",
            inp = in(vreg) value,
            out = lateout(vreg) out,
            options(pure, nomem, nostack),
        );
    }
    out as u16
}

/// Widens binary16 bits to an `f32`.
#[inline]
pub fn f16_to_f32(bits: u16) -> f32 {
    let out: f32;
    unsafe {
        asm!(
            "fcvt {out:s}, {inp:h}",
            inp = in(vreg) bits as i16,
            out = lateout(vreg) out,
            options(pure, nomem, nostack),
        );
    }
    out
}
