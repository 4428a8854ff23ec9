//! Address Layout Tests.

use cachesim_core::sim::AddressLayout;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn field_constants_for_64_byte_lines() {
    let layout = AddressLayout::new(64, 4);
    assert_eq!(layout.set_shift(), 6);
    assert_eq!(layout.line_mask(), 63);
}

#[rstest]
#[case(0x0000, (0, 0))]
#[case(0x003F, (0, 0))]
#[case(0x0040, (1, 0))]
#[case(0x00C0, (3, 0))]
#[case(0x0100, (0, 1))]
#[case(0x1000, (0, 16))]
#[case(0x1234, (0, 18))]
fn decode_splits_set_and_tag(#[case] address: u64, #[case] expected: (usize, u64)) {
    let layout = AddressLayout::new(64, 4);
    assert_eq!(layout.decode(address), expected);
}

/// Set counts that are not powers of two index modulo the set count.
#[test]
fn decode_with_non_power_of_two_sets() {
    let layout = AddressLayout::new(64, 3);
    assert_eq!(layout.decode(0x40 * 7), (1, 2));
}

#[test]
fn line_address_rebuilds_aligned_address() {
    let layout = AddressLayout::new(32, 6);
    for address in [0u64, 0x20, 0x1FF, 0xDEAD_BEEF, 0x7FFF_FFFF_FFE0] {
        let (set, tag) = layout.decode(address);
        assert_eq!(layout.line_address(set, tag), address & !layout.line_mask());
    }
}

#[test]
#[should_panic(expected = "not a power of two")]
fn rejects_non_power_of_two_line_size() {
    let _ = AddressLayout::new(48, 4);
}

#[test]
#[should_panic(expected = "at least one set")]
fn rejects_zero_sets() {
    let _ = AddressLayout::new(64, 0);
}
