/// Converts a hex ASCII character to its nibble value (0-15).
#[inline]
pub fn hex_to_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

/// Strips the line terminator and any trailing space padding.
///
/// Some corpus exports pad lines to a fixed width with spaces.
pub fn trim_line(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && matches!(line[end - 1], b'\n' | b'\r' | b' ') {
        end -= 1;
    }
    &line[..end]
}

/// Parses one `HASH:COUNT` record into a binary hash and a capped count.
///
/// `HASH` is exactly 40 hex characters and `COUNT` a non-empty decimal
/// number; anything else returns `None`. Counts above 65,535 saturate at
/// the 16-bit limit of the database format.
pub fn parse_line(line: &[u8]) -> Option<([u8; 20], u16)> {
    if line.len() < 42 || line[40] != b':' {
        return None;
    }

    let mut hash = [0u8; 20];
    for (i, pair) in line[0..40].chunks_exact(2).enumerate() {
        hash[i] = (hex_to_nibble(pair[0])? << 4) | hex_to_nibble(pair[1])?;
    }

    let mut count = 0u64;
    for &digit in &line[41..] {
        if !digit.is_ascii_digit() {
            return None;
        }
        count = count
            .saturating_mul(10)
            .saturating_add(u64::from(digit - b'0'));
    }

    Some((hash, count.min(u64::from(u16::MAX)) as u16))
}
