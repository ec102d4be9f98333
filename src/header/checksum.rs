//! Header checksum: the unsigned sum of all 512 header bytes, computed with the
//! checksum field itself read as eight ASCII spaces.

use super::octal::{parse_digits, put_digits};
use super::{Field, BLOCK_SIZE};

const CHKSUM_DIGITS: usize = 6;

/// Sums the header bytes, treating the checksum field as eight spaces.
pub fn compute(block: &[u8; BLOCK_SIZE]) -> u32 {
    let chksum = Field::Chksum.range();
    block
        .iter()
        .enumerate()
        .map(|(i, &b)| if chksum.contains(&i) { u32::from(b' ') } else { u32::from(b) })
        .sum()
}

/// Blanks the checksum field, sums the block, and stores the result as six
/// octal digits, a NUL and a space.
///
/// Must be the last write to the block: any later change invalidates the sum.
pub fn write_checksum(block: &mut [u8; BLOCK_SIZE]) -> u32 {
    let range = Field::Chksum.range();
    block[range.clone()].fill(b' ');
    let sum = compute(block);
    // 512 * 0xff = 0o377000 always fits six digits.
    debug_assert!(u64::from(sum) <= super::octal::max_value(CHKSUM_DIGITS + 1));

    let field = &mut block[range];
    put_digits(&mut field[..CHKSUM_DIGITS], u64::from(sum));
    field[CHKSUM_DIGITS] = 0;
    field[CHKSUM_DIGITS + 1] = b' ';
    tracing::trace!(checksum = sum, "header checksum written");
    sum
}

/// Returns the checksum stored in the block, if the field holds octal digits.
pub fn stored(block: &[u8; BLOCK_SIZE]) -> Option<u32> {
    parse_digits(&block[Field::Chksum.range()]).and_then(|v| u32::try_from(v).ok())
}

/// Recomputes the checksum and compares it to the stored value.
pub fn verify(block: &[u8; BLOCK_SIZE]) -> bool {
    stored(block) == Some(compute(block))
}
