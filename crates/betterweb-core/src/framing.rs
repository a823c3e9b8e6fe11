//! Fixed-layout byte packing for the hello payload.
//!
//! Numeric fields are little-endian. Values must fit their declared width
//! exactly; callers range-check before packing.

use crate::error::{ProtocolError, ProtocolResult};

pub fn pack_u8(value: u8) -> [u8; 1] {
    [value]
}

pub fn pack_u32_le(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

/// Read a little-endian u32 at `offset`. Fails if the read would pass the
/// end of the buffer.
pub fn unpack_u32_le(bytes: &[u8], offset: usize) -> ProtocolResult<u32> {
    let end = offset.checked_add(4).ok_or_else(|| {
        ProtocolError::Framing(format!("u32 read offset {offset} overflows"))
    })?;
    let slice = bytes.get(offset..end).ok_or_else(|| {
        ProtocolError::Framing(format!(
            "u32 read at offset {offset} past end of {}-byte buffer",
            bytes.len()
        ))
    })?;
    let mut buf = [0u8; 4];
    buf.copy_from_slice(slice);
    Ok(u32::from_le_bytes(buf))
}

/// Concatenate byte sequences into one buffer.
pub fn concat(parts: &[&[u8]]) -> Vec<u8> {
    let total: usize = parts.iter().map(|p| p.len()).sum();
    let mut out = Vec::with_capacity(total);
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}
