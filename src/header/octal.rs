//! Fixed-width octal ASCII fields.
//!
//! A field of `W` bytes holds `W - 1` zero-padded octal digits followed by a NUL.

use crate::error::{Result, TarError};

/// Largest value representable in a numeric field of `width` bytes.
pub const fn max_value(width: usize) -> u64 {
    let bits = 3 * (width.saturating_sub(1) as u32);
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Encodes `value` into `dst` as `dst.len() - 1` octal digits plus a NUL terminator.
///
/// Fails with [`TarError::FieldOverflow`] (leaving `dst` untouched) when the
/// value needs more digits than the field holds.
pub fn write_octal(dst: &mut [u8], value: u64, field: &'static str) -> Result<()> {
    let max = max_value(dst.len());
    if dst.is_empty() || value > max {
        return Err(TarError::FieldOverflow { field, value, max });
    }
    let digits = dst.len() - 1;
    put_digits(&mut dst[..digits], value);
    dst[digits] = 0;
    Ok(())
}

/// Writes the low `dst.len() * 3` bits of `value` as octal digits, most significant first.
pub(crate) fn put_digits(dst: &mut [u8], mut value: u64) {
    for slot in dst.iter_mut().rev() {
        *slot = b'0' + (value & 0o7) as u8;
        value >>= 3;
    }
}

/// Parses the octal digits at the start of `src`, stopping at the first NUL or space.
pub(crate) fn parse_digits(src: &[u8]) -> Option<u64> {
    let end = src
        .iter()
        .position(|&b| b == 0 || b == b' ')
        .unwrap_or(src.len());
    let text = std::str::from_utf8(&src[..end]).ok()?;
    u64::from_str_radix(text, 8).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_octal_pads_and_terminates() {
        let mut buf = [0xffu8; 8];
        write_octal(&mut buf, 0o755, "mode").unwrap();
        assert_eq!(&buf, b"0000755\0");

        let mut buf = [0u8; 8];
        write_octal(&mut buf, 1000, "uid").unwrap();
        assert_eq!(&buf, b"0001750\0");

        let mut buf = [0u8; 12];
        write_octal(&mut buf, 13, "size").unwrap();
        assert_eq!(&buf, b"00000000015\0");
    }

    #[test]
    fn test_write_octal_accepts_field_maximum() {
        let mut buf = [0u8; 12];
        write_octal(&mut buf, 0o77777777777, "size").unwrap();
        assert_eq!(&buf, b"77777777777\0");
    }

    #[test]
    fn test_write_octal_overflow_is_reported() {
        let mut buf = [0u8; 12];
        let eight_gib = 8 * 1024 * 1024 * 1024;
        let err = write_octal(&mut buf, eight_gib, "size").unwrap_err();
        match err {
            TarError::FieldOverflow { field, value, max } => {
                assert_eq!(field, "size");
                assert_eq!(value, eight_gib);
                assert_eq!(max, eight_gib - 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // nothing was written
        assert_eq!(buf, [0u8; 12]);

        let mut buf = [0u8; 8];
        assert!(write_octal(&mut buf, 0o10000000, "uid").is_err());
    }

    #[test]
    fn test_max_value() {
        assert_eq!(max_value(8), 0o7777777);
        assert_eq!(max_value(12), 0o77777777777);
        assert_eq!(max_value(1), 0);
        assert_eq!(max_value(64), u64::MAX);
    }

    #[test]
    fn test_parse_digits() {
        assert_eq!(parse_digits(b"0000755\0"), Some(0o755));
        assert_eq!(parse_digits(b"012345\0 "), Some(0o12345));
        assert_eq!(parse_digits(b"0008\0"), None);
        assert_eq!(parse_digits(b"\0"), None);
    }
}
