//! # tarstream
//!
//! Encodes in-memory files into a ustar tape-archive byte stream without
//! touching the filesystem.
//!
//! ## Key Modules
//!
//! - [`header`]: The 512-byte header layout, octal field encoding and checksum.
//! - [`padding`]: Block padding arithmetic.
//! - [`archive`]: Writes entries and the end-of-archive tail to any `Write` sink.
//! - [`record`]: The caller-owned [`FileRecord`] input.
//! - [`cli`] and [`cli_runner`]: The `tarstream` command-line front end.
//!
//! ## Examples
//!
//! ```
//! use tarstream::{ArchiveWriter, FileRecord};
//!
//! let mut writer = ArchiveWriter::new(Vec::new());
//! writer.append(&FileRecord::new("hello.txt", b"Hello world!\n").with_mode("644"))?;
//! let bytes = writer.finish()?;
//! assert_eq!(bytes.len(), 512 + 512 + 1024);
//! # Ok::<(), tarstream::TarError>(())
//! ```

pub mod archive;
pub mod cli;
pub mod cli_runner;
pub mod error;
pub mod fsx;
pub mod header;
pub mod padding;
pub mod record;

pub use archive::{write_entry, write_tail, ArchiveWriter, DEFAULT_TAIL_LEN};
pub use error::{Result, TarError};
pub use header::{EncodeOptions, Header, HeaderBuilder, NamePolicy, BLOCK_SIZE};
pub use padding::padding_len;
pub use record::FileRecord;
