//! Logging helpers so served device chunks stay on one log line.

/// Escape raw device output for single-line logging:
/// - `\n` => `\\n`
/// - `\r` => `\\r`
/// - `\t` => `\\t`
/// - backslash => `\\\\`
/// - a null byte => `\\0`
/// - other control or non-ASCII bytes => `\\xNN`
pub fn escape_chunk(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() + 8);
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0 => out.push_str("\\0"),
            b if b.is_ascii_graphic() || b == b' ' => out.push(b as char),
            b => {
                let _ = write!(&mut out, "\\x{:02X}", b);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_chunk;

    #[test]
    fn escapes_newline_and_controls() {
        assert_eq!(escape_chunk(b"IT IS!\n"), "IT IS!\\n");
        assert_eq!(escape_chunk(b"a\tb\\c\0"), "a\\tb\\\\c\\0");
        assert_eq!(escape_chunk(&[0x1B, 0xFF]), "\\x1B\\xFF");
    }
}
