use compemu_core::mask::MAX_TEMP_SLOTS;
use compemu_core::RegMask;

macro_rules! tmp_slot_tests {
    ($( $name:ident: $slot:expr, )+ $(,)?) => {
        $(
            #[test]
            fn $name() {
                let slot: u8 = $slot;
                let m = RegMask::tmp(slot);
                assert!(m.intersects(RegMask::tmp(slot)));
                assert!(!m.intersects(RegMask::FLAGS_NZCVX | RegMask::INTERNAL_NZCV));
                assert!(!m.has_all());
                assert!(!m.is_pinned());
                let next = (slot + 1) % MAX_TEMP_SLOTS;
                assert!(!m.intersects(RegMask::tmp(next)));
            }
        )+
    };
}

tmp_slot_tests! {
    tmp_slot_0: 0,
    tmp_slot_1: 1,
    tmp_slot_7: 7,
    tmp_slot_8: 8,
    tmp_slot_15: 15,
    tmp_slot_24: 24,
    tmp_slot_31: 31,
    tmp_slot_46: 46,
    tmp_slot_47: 47,
}

#[test]
fn mask_empty() {
    let m = RegMask::empty();
    assert!(m.is_empty());
    assert_eq!(m, RegMask::EMPTY);
    assert!(!m.intersects(RegMask::FLAGS_NZCVX));
    assert!(!m.intersects(RegMask::ALL));
}

#[test]
fn mask_union_is_bitwise_or() {
    let m = RegMask::FLAG_N | RegMask::tmp(3);
    assert_eq!(m.raw(), RegMask::FLAG_N.raw() | RegMask::tmp(3).raw());
    assert!(m.contains(RegMask::FLAG_N));
    assert!(m.contains(RegMask::tmp(3)));
    assert!(!m.contains(RegMask::FLAG_Z));
}

#[test]
fn mask_intersect_is_bitwise_and() {
    let a = RegMask::FLAGS_NZCV | RegMask::tmp(1);
    let b = RegMask::FLAG_C | RegMask::tmp(2);
    assert_eq!(a.intersect(b), RegMask::FLAG_C);
}

#[test]
fn mask_guest_and_internal_flags_are_distinct() {
    assert!(!RegMask::FLAGS_NZCVX.intersects(RegMask::INTERNAL_NZCV));
    assert_eq!(
        RegMask::INTERNAL_NZ | RegMask::INTERNAL_CV,
        RegMask::INTERNAL_NZCV
    );
}

#[test]
fn mask_all_overlaps_any_register() {
    assert!(RegMask::ALL.has_all());
    assert!(RegMask::ALL.intersects(RegMask::tmp(5)));
    assert!(RegMask::FLAG_X.intersects(RegMask::ALL));
    assert!(RegMask::ALL.intersects(RegMask::ALL));
    assert!(RegMask::ALL.contains(RegMask::INTERNAL_NZCV));
}

#[test]
fn mask_no_optim_names_no_register() {
    let pin = RegMask::NO_OPTIM;
    assert!(pin.is_pinned());
    assert!(!pin.is_empty());
    assert!(!pin.intersects(RegMask::NO_OPTIM));
    assert!(!pin.intersects(RegMask::ALL));
    assert!(!(pin | RegMask::tmp(0)).intersects(RegMask::tmp(1)));
}

#[test]
fn mask_sentinels_survive_union() {
    let m = RegMask::tmp(2) | RegMask::NO_OPTIM;
    assert!(m.is_pinned());
    assert!(!m.has_all());
    assert_eq!(m.raw(), RegMask::tmp(2).raw());

    let m = RegMask::FLAG_N | RegMask::ALL;
    assert!(m.has_all());
    assert!(!m.is_pinned());
}

#[test]
fn mask_highest_slot_does_not_collide_with_flags() {
    let top = RegMask::tmp(MAX_TEMP_SLOTS - 1);
    assert_eq!(top.raw(), 1u64 << 63);
    assert!(!top.intersects(RegMask::FLAGS_NZCVX | RegMask::INTERNAL_NZCV));
}

#[test]
#[should_panic(expected = "temp slot out of mask range")]
fn mask_slot_out_of_range() {
    let _ = RegMask::tmp(MAX_TEMP_SLOTS);
}
