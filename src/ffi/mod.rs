pub mod bindings;

/// Encodes text as a NUL-terminated UTF-16 string for the native boundary.
pub fn to_wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain([0]).collect()
}

/// Decodes a NUL-delimited wide-character list into its segments.
///
/// The native convention is a sequence of NUL-terminated strings with an
/// extra NUL after the last one; empty segments only occur as terminators
/// and are dropped.
pub fn split_wide_list(buf: &[u16]) -> Vec<String> {
    buf.split(|&w| w == 0)
        .filter(|s| !s.is_empty())
        .map(String::from_utf16_lossy)
        .collect()
}

// Fixed-offset readers for the canonical counter-metadata blob.
// Each advances the slice past the value it read; `None` means the
// blob was shorter than its layout promises.

pub fn take_u32(buf: &mut &[u8]) -> Option<u32> {
    let (head, rest) = buf.split_first_chunk::<4>()?;
    *buf = rest;
    Some(u32::from_le_bytes(*head))
}

pub fn take_i32(buf: &mut &[u8]) -> Option<i32> {
    take_u32(buf).map(|v| v as i32)
}

/// Reads one NUL-terminated UTF-16 string and consumes its terminator.
pub fn take_wide_str(buf: &mut &[u8]) -> Option<String> {
    let mut units = Vec::new();
    loop {
        let (head, rest) = buf.split_first_chunk::<2>()?;
        *buf = rest;
        let unit = u16::from_le_bytes(*head);
        if unit == 0 {
            return Some(String::from_utf16_lossy(&units));
        }
        units.push(unit);
    }
}

pub fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub fn put_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub fn put_wide_str(buf: &mut Vec<u8>, text: &str) {
    for unit in text.encode_utf16().chain([0]) {
        buf.extend_from_slice(&unit.to_le_bytes());
    }
}
