//! Bit kernels: concrete scenarios, agreement with the core builtins and the
//! rotation round-trip law for every width.

use lanemath::bits::{self, scalar, BitOps};
use proptest::prelude::*;

#[test]
fn test_concrete_scenarios() {
    assert_eq!(bits::popcount_u32(0xFFFF_FFFF), 32);
    assert_eq!(bits::clz_u32(0), 32);
    assert_eq!(bits::ctz_u32(0), 32);
    assert_eq!(bits::lrotate_u32(0x8000_0000, 1), 1);

    assert_eq!(bits::popcount_u64(u64::MAX), 64);
    assert_eq!(bits::clz_u64(0), 64);
    assert_eq!(bits::ctz_u64(0), 64);
    assert_eq!(bits::rrotate_u64(1, 1), 0x8000_0000_0000_0000);
}

#[test]
fn test_signed_inputs_use_twos_complement() {
    assert_eq!(bits::popcount_i32(-1), 32);
    assert_eq!(bits::clz_i32(-1), 0);
    assert_eq!(bits::ctz_i64(i64::MIN), 63);
    assert_eq!(bits::lrotate_i32(i32::MIN, 1), 1);
    assert_eq!((-2i64).ctz(), 1);
}

#[test]
fn test_rotation_counts_wrap() {
    let x = 0x1234_5678u32;
    assert_eq!(bits::lrotate_u32(x, 32), x);
    assert_eq!(bits::lrotate_u32(x, 36), bits::lrotate_u32(x, 4));
    assert_eq!(bits::lrotate_u32(x, -1), bits::rrotate_u32(x, 1));
    assert_eq!(bits::rrotate_u64(0xF0, -4), 0xF00);
}

#[test]
fn test_backend_names() {
    for name in [
        bits::POPCOUNT_BACKEND,
        bits::CLZ_BACKEND,
        bits::CTZ_BACKEND,
        bits::ROTATE_BACKEND,
    ] {
        println!("bits backend: {name}");
        assert!(!name.is_empty());
    }
}

proptest! {
    #[test]
    fn prop_u32_matches_builtins(x in any::<u32>(), k in any::<i32>()) {
        prop_assert_eq!(x.popcount(), x.count_ones());
        prop_assert_eq!(x.clz(), x.leading_zeros());
        prop_assert_eq!(x.ctz(), x.trailing_zeros());
        prop_assert_eq!(x.lrotate(k), x.rotate_left(k as u32 & 31));
        prop_assert_eq!(x.rrotate(k), x.rotate_right(k as u32 & 31));
    }

    #[test]
    fn prop_u64_matches_builtins(x in any::<u64>(), k in any::<i32>()) {
        prop_assert_eq!(x.popcount(), x.count_ones());
        prop_assert_eq!(x.clz(), x.leading_zeros());
        prop_assert_eq!(x.ctz(), x.trailing_zeros());
        prop_assert_eq!(x.lrotate(k), x.rotate_left(k as u32 & 63));
        prop_assert_eq!(x.rrotate(k), x.rotate_right(k as u32 & 63));
    }

    #[test]
    fn prop_selected_matches_portable(x in any::<u64>(), k in any::<i32>()) {
        let lo = x as u32;
        prop_assert_eq!(bits::popcount_u32(lo), scalar::popcount32(lo));
        prop_assert_eq!(bits::clz_u32(lo), scalar::clz32(lo));
        prop_assert_eq!(bits::ctz_u32(lo), scalar::ctz32(lo));
        prop_assert_eq!(bits::lrotate_u32(lo, k), scalar::lrotate32(lo, k));
        prop_assert_eq!(bits::popcount_u64(x), scalar::popcount64(x));
        prop_assert_eq!(bits::clz_u64(x), scalar::clz64(x));
        prop_assert_eq!(bits::ctz_u64(x), scalar::ctz64(x));
        prop_assert_eq!(bits::rrotate_u64(x, k), scalar::rrotate64(x, k));
    }

    #[test]
    fn prop_rotate_round_trip(a in any::<i32>(), b in any::<u32>(), c in any::<i64>(), d in any::<u64>(), k in any::<i32>()) {
        prop_assert_eq!(a.lrotate(k).rrotate(k), a);
        prop_assert_eq!(b.lrotate(k).rrotate(k), b);
        prop_assert_eq!(c.lrotate(k).rrotate(k), c);
        prop_assert_eq!(d.lrotate(k).rrotate(k), d);
        prop_assert_eq!(b.rrotate(k).lrotate(k), b);
    }
}
