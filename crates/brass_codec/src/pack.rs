//! Packed variable-length unsigned integers.
//!
//! Seven bits per byte, least significant group first. Every byte except the
//! last has its high bit set.

use crate::error::{CodecError, CodecResult};
use bytes::{Buf, BufMut};

/// Appends `value` to `buf` in packed form.
pub fn pack_uint<B: BufMut>(buf: &mut B, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Reads one packed integer from the front of `buf`.
///
/// # Errors
///
/// Returns [`CodecError::UnexpectedEof`] if the input ends before the final
/// byte and [`CodecError::IntegerOverflow`] if the value needs more than 64
/// bits.
pub fn unpack_uint<B: Buf>(buf: &mut B) -> CodecResult<u64> {
    let mut result = 0u64;
    let mut shift = 0u32;
    loop {
        if !buf.has_remaining() {
            return Err(CodecError::UnexpectedEof);
        }
        let byte = buf.get_u8();
        let chunk = u64::from(byte & 0x7f);

        if shift >= 64 || (shift > 0 && chunk >> (64 - shift) != 0) {
            return Err(CodecError::IntegerOverflow);
        }
        result |= chunk << shift;

        if byte < 0x80 {
            return Ok(result);
        }
        shift += 7;
    }
}
