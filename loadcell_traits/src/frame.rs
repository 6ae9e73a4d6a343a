//! Layout of the 3-byte conversion frame the ADS1230 shifts out.

/// Bytes clocked per conversion.
pub const FRAME_LEN: usize = 3;

/// Pack a signed 20-bit conversion into a frame: the value fills the top 20
/// of 24 bits, MSB first, and the low nibble is zero.
pub fn encode_frame(value: i32) -> [u8; FRAME_LEN] {
    let raw24 = ((value as u32) << 4) & 0x00FF_FFFF;
    [(raw24 >> 16) as u8, (raw24 >> 8) as u8, raw24 as u8]
}
