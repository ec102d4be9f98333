//! # ustar Header Encoding
//!
//! Builds the 512-byte header block that precedes every entry in the stream.
//! The block is assembled field by field from the [`LAYOUT`] table; the table
//! is checked at compile time to tile the block exactly.

pub mod checksum;
pub mod octal;

use std::fmt;
use std::ops::Range;

use tracing::warn;

use crate::error::{Result, TarError};
use crate::record::FileRecord;

/// Size of a header block and the unit of content padding.
pub const BLOCK_SIZE: usize = 512;

/// Type flag for a regular file.
pub const TYPEFLAG_REGULAR: u8 = b'0';
/// Format signature, not NUL-terminated.
pub const MAGIC: &[u8; 6] = b"ustar ";
/// Version marker following the signature.
pub const VERSION: &[u8; 2] = b" \0";

/// Every field of the header block, in on-disk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Mode,
    Uid,
    Gid,
    Size,
    Mtime,
    Chksum,
    Typeflag,
    Linkname,
    Magic,
    Version,
    Uname,
    Gname,
    Devmajor,
    Devminor,
    Prefix,
    Padding,
}

/// Position of one field inside the header block.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
}

const fn spec(field: Field, name: &'static str, offset: usize, width: usize) -> FieldSpec {
    FieldSpec { field, name, offset, width }
}

/// The header layout, indexed by `Field as usize`.
pub const LAYOUT: [FieldSpec; 17] = [
    spec(Field::Name, "name", 0, 100),
    spec(Field::Mode, "mode", 100, 8),
    spec(Field::Uid, "uid", 108, 8),
    spec(Field::Gid, "gid", 116, 8),
    spec(Field::Size, "size", 124, 12),
    spec(Field::Mtime, "mtime", 136, 12),
    spec(Field::Chksum, "chksum", 148, 8),
    spec(Field::Typeflag, "typeflag", 156, 1),
    spec(Field::Linkname, "linkname", 157, 100),
    spec(Field::Magic, "magic", 257, 6),
    spec(Field::Version, "version", 263, 2),
    spec(Field::Uname, "uname", 265, 32),
    spec(Field::Gname, "gname", 297, 32),
    spec(Field::Devmajor, "devmajor", 329, 8),
    spec(Field::Devminor, "devminor", 337, 8),
    spec(Field::Prefix, "prefix", 345, 155),
    spec(Field::Padding, "padding", 500, 12),
];

const _: () = {
    let mut end = 0;
    let mut i = 0;
    while i < LAYOUT.len() {
        assert!(LAYOUT[i].field as usize == i, "LAYOUT must be indexed by Field");
        assert!(LAYOUT[i].offset == end, "header fields must be contiguous");
        end += LAYOUT[i].width;
        i += 1;
    }
    assert!(end == BLOCK_SIZE, "header fields must fill exactly one block");
};

impl Field {
    pub const fn spec(self) -> FieldSpec {
        LAYOUT[self as usize]
    }

    pub const fn name(self) -> &'static str {
        self.spec().name
    }

    pub const fn offset(self) -> usize {
        self.spec().offset
    }

    pub const fn width(self) -> usize {
        self.spec().width
    }

    pub const fn range(self) -> Range<usize> {
        let spec = self.spec();
        spec.offset..spec.offset + spec.width
    }
}

/// What to do with a text value that does not fit its field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamePolicy {
    /// Reject the entry with [`TarError::NameTooLong`].
    #[default]
    Strict,
    /// Keep the leading `width - 1` bytes and drop the rest.
    Truncate,
}

/// Options that affect how headers are encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    pub name_policy: NamePolicy,
}

impl EncodeOptions {
    /// Legacy behaviour: over-length names are truncated without error.
    pub fn truncating() -> Self {
        Self { name_policy: NamePolicy::Truncate }
    }
}

/// A finished, checksummed header block.
#[derive(Clone, PartialEq, Eq)]
pub struct Header([u8; BLOCK_SIZE]);

impl Header {
    pub fn as_bytes(&self) -> &[u8; BLOCK_SIZE] {
        &self.0
    }

    /// Raw bytes of a single field.
    pub fn field(&self, field: Field) -> &[u8] {
        &self.0[field.range()]
    }

    /// The stored checksum value.
    pub fn checksum(&self) -> Option<u32> {
        checksum::stored(&self.0)
    }

    pub fn into_bytes(self) -> [u8; BLOCK_SIZE] {
        self.0
    }
}

impl AsRef<[u8]> for Header {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.field(Field::Name);
        let end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
        f.debug_struct("Header")
            .field("name", &String::from_utf8_lossy(&name[..end]))
            .field("size", &octal::parse_digits(self.field(Field::Size)))
            .field("checksum", &self.checksum())
            .finish()
    }
}

/// Assembles header blocks from [`FileRecord`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderBuilder {
    options: EncodeOptions,
}

impl HeaderBuilder {
    pub fn new(options: EncodeOptions) -> Self {
        Self { options }
    }

    /// Builds the header for `record`. The checksum is written last.
    pub fn build(&self, record: &FileRecord<'_>) -> Result<Header> {
        self.build_sized(record, record.size())
    }

    /// Builds the header with an explicit `size` field value.
    fn build_sized(&self, record: &FileRecord<'_>, size: u64) -> Result<Header> {
        let mut block = [0u8; BLOCK_SIZE];

        self.put_text(&mut block, Field::Name, record.name)?;
        put_number(&mut block, Field::Mode, parse_mode(record.mode)?)?;
        put_number(&mut block, Field::Uid, u64::from(record.uid))?;
        put_number(&mut block, Field::Gid, u64::from(record.gid))?;
        put_number(&mut block, Field::Size, size)?;
        put_number(&mut block, Field::Mtime, record.mtime)?;

        block[Field::Typeflag.offset()] = TYPEFLAG_REGULAR;
        block[Field::Magic.range()].copy_from_slice(MAGIC);
        block[Field::Version.range()].copy_from_slice(VERSION);

        self.put_text(&mut block, Field::Uname, record.uname)?;
        self.put_text(&mut block, Field::Gname, record.gname)?;

        checksum::write_checksum(&mut block);
        debug_assert!(checksum::verify(&block));
        Ok(Header(block))
    }

    fn put_text(&self, block: &mut [u8; BLOCK_SIZE], field: Field, text: &str) -> Result<()> {
        let bytes = text.as_bytes();
        let max = field.width() - 1;
        let len = if bytes.len() <= max {
            bytes.len()
        } else {
            match self.options.name_policy {
                NamePolicy::Strict => {
                    return Err(TarError::NameTooLong { field: field.name(), len: bytes.len(), max });
                }
                NamePolicy::Truncate => {
                    warn!(field = field.name(), len = bytes.len(), max, "truncating over-length header field");
                    max
                }
            }
        };
        block[field.offset()..field.offset() + len].copy_from_slice(&bytes[..len]);
        Ok(())
    }
}

fn put_number(block: &mut [u8; BLOCK_SIZE], field: Field, value: u64) -> Result<()> {
    octal::write_octal(&mut block[field.range()], value, field.name())
}

/// Validates a textual mode such as `"644"` or `"0755"` and returns its value.
///
/// The value is re-encoded as seven zero-padded digits, which is the same text
/// as left-padding the string with `'0'`.
pub fn parse_mode(mode: &str) -> Result<u64> {
    let invalid = |reason| TarError::InvalidMode { mode: mode.to_string(), reason };
    let max_digits = Field::Mode.width() - 1;
    if mode.is_empty() {
        return Err(invalid("mode is empty"));
    }
    if mode.len() > max_digits {
        return Err(invalid("more than 7 octal digits"));
    }
    if !mode.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        return Err(invalid("contains a non-octal digit"));
    }
    u64::from_str_radix(mode, 8).map_err(|_| invalid("contains a non-octal digit"))
}
