//! Block padding arithmetic.

use crate::header::BLOCK_SIZE;

/// A block of zeros for entry padding and end-of-archive markers.
pub(crate) const ZERO_BLOCK: [u8; BLOCK_SIZE] = [0; BLOCK_SIZE];

/// Returns the number of null bytes that round `content_len` up to the next
/// 512-byte boundary. Zero when `content_len` is already a multiple of 512.
pub fn padding_len(content_len: u64) -> usize {
    let rem = (content_len % BLOCK_SIZE as u64) as usize;
    (BLOCK_SIZE - rem) % BLOCK_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_on_block_boundaries() {
        assert_eq!(padding_len(0), 0);
        assert_eq!(padding_len(512), 0);
        assert_eq!(padding_len(4096), 0);
    }

    #[test]
    fn test_padding_rounds_up() {
        assert_eq!(padding_len(1), 511);
        assert_eq!(padding_len(13), 499);
        assert_eq!(padding_len(511), 1);
        assert_eq!(padding_len(513), 511);
    }

    #[test]
    fn test_padded_length_is_block_aligned() {
        for n in [0u64, 1, 100, 511, 512, 1000, 1023, 1024, 65_537, 8 * 1024 * 1024 * 1024 - 1] {
            assert_eq!((n + padding_len(n) as u64) % BLOCK_SIZE as u64, 0, "length {n}");
        }
    }
}
