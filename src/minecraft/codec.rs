//! Wire primitives of the Java edition protocol.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::minecraft::MinecraftError;

const SEGMENT_BITS: u8 = 0x7F;
const CONTINUE_BIT: u8 = 0x80;
/// A VarInt never spans more than 5 bytes.
const MAX_VARINT_LEN: usize = 5;

pub fn write_varint(buf: &mut Vec<u8>, value: i32) {
    let mut value = value as u32;
    loop {
        if value & !(SEGMENT_BITS as u32) == 0 {
            buf.push(value as u8);
            return;
        }
        buf.push((value as u8 & SEGMENT_BITS) | CONTINUE_BIT);
        value >>= 7;
    }
}

/// Writes a VarInt length prefix followed by the UTF-8 bytes.
pub fn write_string(buf: &mut Vec<u8>, value: &str) {
    write_varint(buf, value.len() as i32);
    buf.extend_from_slice(value.as_bytes());
}

/// Prefixes `payload` with its VarInt length.
pub fn frame(payload: &[u8]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(payload.len() + MAX_VARINT_LEN);
    write_varint(&mut packet, payload.len() as i32);
    packet.extend_from_slice(payload);
    packet
}

/// Decodes a VarInt at the start of `data`, returning it with the number of bytes read.
pub fn decode_varint(data: &[u8]) -> Result<(i32, usize), MinecraftError> {
    let mut value: u32 = 0;
    for (position, byte) in data.iter().take(MAX_VARINT_LEN).enumerate() {
        value |= ((byte & SEGMENT_BITS) as u32) << (7 * position);
        if byte & CONTINUE_BIT == 0 {
            return Ok((value as i32, position + 1));
        }
    }

    if data.len() < MAX_VARINT_LEN {
        Err(MinecraftError::Protocol("truncated varint".to_owned()))
    } else {
        Err(MinecraftError::Protocol("varint too long".to_owned()))
    }
}

pub async fn read_varint<R: AsyncRead + Unpin>(reader: &mut R) -> Result<i32, MinecraftError> {
    let mut value: u32 = 0;
    for position in 0..MAX_VARINT_LEN {
        let byte = reader.read_u8().await?;
        value |= ((byte & SEGMENT_BITS) as u32) << (7 * position);
        if byte & CONTINUE_BIT == 0 {
            return Ok(value as i32);
        }
    }
    Err(MinecraftError::Protocol("varint too long".to_owned()))
}

/// Decodes a VarInt prefixed string at the start of `data`.
pub fn decode_string(data: &[u8]) -> Result<(String, usize), MinecraftError> {
    let (length, read) = decode_varint(data)?;
    let length = usize::try_from(length)
        .map_err(|_| MinecraftError::Protocol("negative string length".to_owned()))?;
    let bytes = data
        .get(read..read + length)
        .ok_or_else(|| MinecraftError::Protocol("truncated string".to_owned()))?;
    let value = String::from_utf8(bytes.to_vec())
        .map_err(|_| MinecraftError::Protocol("string is not utf-8".to_owned()))?;
    Ok((value, read + length))
}
