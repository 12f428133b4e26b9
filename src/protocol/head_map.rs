use bytes::{Buf, BufMut, BytesMut};
use std::collections::HashMap;

/// Appends the head-map encoding to `buf`.
///
/// Each entry is `(key_len: u16, key_bytes, value_len: u16, value_bytes)`,
/// big-endian, with a zero length encoding the empty string. Entry order is
/// not significant on the wire.
pub fn encode_head_map(map: &HashMap<String, String>, buf: &mut BytesMut) {
    for (key, value) in map {
        buf.put_u16(key.len() as u16);
        buf.put_slice(key.as_bytes());
        buf.put_u16(value.len() as u16);
        buf.put_slice(value.as_bytes());
    }
}

/// Decodes exactly `data.len()` bytes of head-map encoding.
///
/// A truncated trailing entry terminates the scan; everything decoded up to
/// that point is kept. The outer header already bounds `data`, so a short
/// entry here cannot desynchronize the stream.
pub fn decode_head_map(mut data: &[u8]) -> HashMap<String, String> {
    let mut map = HashMap::new();

    while data.remaining() >= 2 {
        let key_len = data.get_u16() as usize;
        if data.remaining() < key_len {
            break;
        }
        let key = String::from_utf8_lossy(&data[..key_len]).into_owned();
        data.advance(key_len);

        if data.remaining() < 2 {
            break;
        }
        let value_len = data.get_u16() as usize;
        if data.remaining() < value_len {
            break;
        }
        let value = String::from_utf8_lossy(&data[..value_len]).into_owned();
        data.advance(value_len);

        map.insert(key, value);
    }

    map
}
