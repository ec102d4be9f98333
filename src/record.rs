//! Input records: one in-memory file and its metadata.

/// Permission string used when the caller does not supply one.
pub const DEFAULT_MODE: &str = "644";
/// Owner and group name used when the caller does not supply them.
pub const DEFAULT_OWNER: &str = "root";

/// Metadata and content for a single regular-file entry.
///
/// Everything is borrowed; the record is only read for the duration of one write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRecord<'a> {
    /// Entry name, at most 99 bytes.
    pub name: &'a str,
    pub content: &'a [u8],
    /// Modification time in seconds since the Unix epoch.
    pub mtime: u64,
    /// Octal permission string, e.g. `"644"` or `"0755"`.
    pub mode: &'a str,
    pub uid: u32,
    pub gid: u32,
    /// Owner name, at most 31 bytes.
    pub uname: &'a str,
    /// Group name, at most 31 bytes.
    pub gname: &'a str,
}

impl<'a> FileRecord<'a> {
    /// Creates a record owned by `root:root` with mode `644` and mtime 0.
    pub fn new(name: &'a str, content: &'a [u8]) -> Self {
        Self {
            name,
            content,
            mtime: 0,
            mode: DEFAULT_MODE,
            uid: 0,
            gid: 0,
            uname: DEFAULT_OWNER,
            gname: DEFAULT_OWNER,
        }
    }

    pub fn with_mode(mut self, mode: &'a str) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_mtime(mut self, mtime: u64) -> Self {
        self.mtime = mtime;
        self
    }

    /// Stamps the record with the current wall-clock time.
    pub fn with_mtime_now(self) -> Self {
        self.with_mtime(now_mtime())
    }

    pub fn with_owner(mut self, uid: u32, gid: u32) -> Self {
        self.uid = uid;
        self.gid = gid;
        self
    }

    pub fn with_owner_names(mut self, uname: &'a str, gname: &'a str) -> Self {
        self.uname = uname;
        self.gname = gname;
        self
    }

    /// Content length as stored in the `size` field.
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Current UTC time in whole seconds, clamped to zero before the epoch.
pub fn now_mtime() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let record = FileRecord::new("a.txt", b"abc");
        assert_eq!(record.mode, "644");
        assert_eq!((record.uid, record.gid), (0, 0));
        assert_eq!((record.uname, record.gname), ("root", "root"));
        assert_eq!(record.mtime, 0);
        assert_eq!(record.size(), 3);
    }

    #[test]
    fn test_builders_override_single_fields() {
        let record = FileRecord::new("a.txt", b"")
            .with_mode("755")
            .with_owner(1000, 100)
            .with_owner_names("alice", "users")
            .with_mtime(42);
        assert_eq!(record.mode, "755");
        assert_eq!((record.uid, record.gid), (1000, 100));
        assert_eq!((record.uname, record.gname), ("alice", "users"));
        assert_eq!(record.mtime, 42);
    }

    #[test]
    fn test_mtime_now_is_recent() {
        let before = now_mtime();
        let record = FileRecord::new("a.txt", b"").with_mtime_now();
        assert!(record.mtime >= before);
        // 2020-01-01
        assert!(record.mtime > 1_577_836_800);
    }
}
