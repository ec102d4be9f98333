use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::archive::DEFAULT_TAIL_LEN;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Create a tar archive from files and directories.
    #[command(alias = "c")]
    Create {
        /// One or more input files or directories. Directories contribute their regular files.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// The path for the output archive (e.g., out.tar). Omit or pass `-` for stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Octal permission string for every entry (e.g. 644). Defaults to each file's own mode.
        #[arg(long)]
        mode: Option<String>,

        /// Owner user ID for every entry.
        #[arg(long, default_value_t = 0)]
        uid: u32,

        /// Owner group ID for every entry.
        #[arg(long, default_value_t = 0)]
        gid: u32,

        /// Owner user name. Falls back to TARSTREAM_UNAME, then `root`.
        #[arg(long)]
        uname: Option<String>,

        /// Owner group name. Falls back to TARSTREAM_GNAME, then `root`.
        #[arg(long)]
        gname: Option<String>,

        /// Fixed modification time (seconds since epoch) for every entry.
        #[arg(long, conflicts_with = "mtime_now")]
        mtime: Option<u64>,

        /// Stamp every entry with the current time instead of the file's own mtime.
        #[arg(long)]
        mtime_now: bool,

        /// Truncate over-length names instead of failing.
        #[arg(long)]
        truncate_names: bool,

        /// Number of zero bytes written after the last entry.
        #[arg(long, default_value_t = DEFAULT_TAIL_LEN)]
        tail_length: usize,
    },
}

/// Environment variable consulted for the owner name.
pub const UNAME_ENV: &str = "TARSTREAM_UNAME";
/// Environment variable consulted for the group name.
pub const GNAME_ENV: &str = "TARSTREAM_GNAME";

/// Gets an owner name from the command-line option, then the given environment variable.
///
/// Priority:
/// 1. command-line argument.
/// 2. environment variable `var`.
/// 3. Returns `None` if neither is present, leaving the default to the caller.
pub fn get_owner_from_opt_or_env(opt: Option<String>, var: &str) -> Option<String> {
    opt.or_else(|| std::env::var(var).ok().filter(|v| !v.is_empty()))
}

/// Parses command-line arguments using `clap`.
pub fn run() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults() {
        let args = Args::try_parse_from(["tarstream", "create", "a.txt"]).unwrap();
        assert_eq!(args.verbose, 0);
        match args.command {
            Commands::Create { inputs, output, mode, uid, gid, mtime, mtime_now, truncate_names, tail_length, .. } => {
                assert_eq!(inputs, vec![PathBuf::from("a.txt")]);
                assert!(output.is_none());
                assert!(mode.is_none());
                assert_eq!((uid, gid), (0, 0));
                assert!(mtime.is_none());
                assert!(!mtime_now);
                assert!(!truncate_names);
                assert_eq!(tail_length, 1024);
            }
        }
    }

    #[test]
    fn test_alias_and_flags() {
        let args = Args::try_parse_from([
            "tarstream", "-vv", "c", "-o", "out.tar", "--mode", "0755", "--uid", "1000", "--mtime", "0", "x",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        let Commands::Create { output, mode, uid, mtime, .. } = args.command;
        assert_eq!(output, Some(PathBuf::from("out.tar")));
        assert_eq!(mode.as_deref(), Some("0755"));
        assert_eq!(uid, 1000);
        assert_eq!(mtime, Some(0));
    }

    #[test]
    fn test_mtime_conflicts_with_now() {
        let res = Args::try_parse_from(["tarstream", "create", "--mtime", "1", "--mtime-now", "x"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_inputs_required() {
        assert!(Args::try_parse_from(["tarstream", "create"]).is_err());
    }

    #[test]
    fn test_owner_option_wins_over_env() {
        let var = "TARSTREAM_TEST_OWNER_OPT";
        std::env::set_var(var, "from-env");
        assert_eq!(get_owner_from_opt_or_env(Some("alice".into()), var).as_deref(), Some("alice"));
        assert_eq!(get_owner_from_opt_or_env(None, var).as_deref(), Some("from-env"));
        std::env::remove_var(var);
        assert_eq!(get_owner_from_opt_or_env(None, var), None);
    }
}
