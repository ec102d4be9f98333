use std::path::PathBuf;

use thiserror::Error;

/// The primary error type for all operations in the `tarstream` crate.
#[derive(Debug, Error)]
pub enum TarError {
    /// A numeric value needs more octal digits than its header field holds.
    /// File sizes of 8 GiB and above hit this in the 12-byte `size` field.
    #[error("value {value} does not fit the {field} field (max {max})")]
    FieldOverflow { field: &'static str, value: u64, max: u64 },

    /// A text field is longer than its header field can hold with a terminator.
    #[error("{field} is {len} bytes long, the field holds at most {max}")]
    NameTooLong { field: &'static str, len: usize, max: usize },

    /// The textual mode is empty, too long, or not made of octal digits.
    #[error("invalid file mode {mode:?}: {reason}")]
    InvalidMode { mode: String, reason: &'static str },

    /// Writing to the output sink failed. The underlying error is passed through unchanged.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A filesystem operation on a named path failed, typically while reading
    /// CLI inputs or creating the output file. Includes the path where the error happened.
    #[error("I/O error on path '{}': {}", path.display(), source)]
    Path { source: std::io::Error, path: PathBuf },
}

pub type Result<T> = std::result::Result<T, TarError>;
