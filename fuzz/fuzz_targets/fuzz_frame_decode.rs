#![no_main]
use libfuzzer_sys::fuzz_target;
use loadcell_core::decode_frame;

fuzz_target!(|bytes: [u8; 3]| {
    let v = decode_frame(bytes);
    // Always a sign-extended 20-bit value
    assert!((-0x80000..=0x7FFFF).contains(&v));
    // Low nibble of the last byte never matters
    assert_eq!(v, decode_frame([bytes[0], bytes[1], bytes[2] & 0xF0]));
});
