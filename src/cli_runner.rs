//! CLI runner: turns parsed arguments into an archive on disk or stdout.
//!
//! Inputs are read fully into memory first, then encoded in the order they were
//! discovered. Directory walks are sorted by file name so output is reproducible.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use crate::archive::ArchiveWriter;
use crate::cli::{self, Commands};
use crate::error::{Result, TarError};
use crate::fsx;
use crate::header::{EncodeOptions, HeaderBuilder, NamePolicy};
use crate::record::{self, FileRecord, DEFAULT_OWNER};

/// A file loaded from disk, ready to become an archive entry.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub content: Vec<u8>,
    pub mode: String,
    pub mtime: u64,
}

/// Metadata applied to every entry of one `create` run.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub mode: Option<String>,
    pub uid: u32,
    pub gid: u32,
    pub uname: Option<String>,
    pub gname: Option<String>,
    pub mtime: Option<u64>,
    pub encode: EncodeOptions,
    pub tail_length: usize,
}

/// Public entry for running CLI logic.
pub fn run_cli_app() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = cli::run();
    init_tracing(args.verbose);

    match args.command {
        Commands::Create {
            inputs,
            output,
            mode,
            uid,
            gid,
            uname,
            gname,
            mtime,
            mtime_now,
            truncate_names,
            tail_length,
        } => {
            let options = CreateOptions {
                mode,
                uid,
                gid,
                uname: cli::get_owner_from_opt_or_env(uname, cli::UNAME_ENV),
                gname: cli::get_owner_from_opt_or_env(gname, cli::GNAME_ENV),
                mtime: if mtime_now { Some(record::now_mtime()) } else { mtime },
                encode: EncodeOptions {
                    name_policy: if truncate_names { NamePolicy::Truncate } else { NamePolicy::Strict },
                },
                tail_length,
            };

            let files = collect_inputs(&inputs)?;
            // Every header is built before the output is opened, so a bad
            // entry never leaves a partial archive behind.
            let records = prepare_records(&files, &options)?;
            let bytes = match output.as_deref() {
                Some(path) if path != Path::new("-") => write_archive_file(path, &records, &options)?,
                _ => write_records(BufWriter::new(io::stdout().lock()), &records, &options)?,
            };
            info!(entries = files.len(), bytes, "archive written");
        }
    }

    Ok(())
}

/// Installs a stderr `fmt` subscriber. `RUST_LOG` takes precedence over `-v`.
pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Encodes `files` into `sink` and writes the tail. Returns the total byte count.
///
/// All records are validated first; an encoding error leaves `sink` untouched.
pub fn write_archive<W: Write>(sink: W, files: &[InputFile], options: &CreateOptions) -> Result<u64> {
    let records = prepare_records(files, options)?;
    write_records(sink, &records, options)
}

/// Applies the run-wide overrides to `files` and checks that every resulting
/// header encodes.
pub fn prepare_records<'a>(files: &'a [InputFile], options: &'a CreateOptions) -> Result<Vec<FileRecord<'a>>> {
    let uname = options.uname.as_deref().unwrap_or(DEFAULT_OWNER);
    let gname = options.gname.as_deref().unwrap_or(DEFAULT_OWNER);
    let builder = HeaderBuilder::new(options.encode);

    files
        .iter()
        .map(|file| -> Result<FileRecord<'a>> {
            let record = FileRecord::new(&file.name, &file.content)
                .with_mode(options.mode.as_deref().unwrap_or(&file.mode))
                .with_owner(options.uid, options.gid)
                .with_owner_names(uname, gname)
                .with_mtime(options.mtime.unwrap_or(file.mtime));
            builder.build(&record)?;
            Ok(record)
        })
        .collect()
}

/// Writes already validated records and the tail to `sink`.
pub fn write_records<W: Write>(sink: W, records: &[FileRecord<'_>], options: &CreateOptions) -> Result<u64> {
    let mut writer = ArchiveWriter::with_options(sink, options.encode);
    for record in records {
        writer.append(record)?;
    }
    let entries = writer.entry_count();
    let body = writer.bytes_written();
    writer.finish_with_tail(options.tail_length)?;
    debug!(entries, "all entries written");
    Ok(body + options.tail_length as u64)
}

/// Writes the archive to `path`, removing the file again if writing fails.
fn write_archive_file(path: &Path, records: &[FileRecord<'_>], options: &CreateOptions) -> Result<u64> {
    let file = File::create(path).map_err(|source| TarError::Path { source, path: path.to_path_buf() })?;
    match write_records(BufWriter::new(file), records, options) {
        Ok(bytes) => Ok(bytes),
        Err(err) => {
            if let Err(e) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %e, "failed to remove incomplete archive");
            }
            Err(err)
        }
    }
}

/// Loads every regular file named by `inputs`, expanding directories.
///
/// Entry names are relative to the parent of each input, so `dir` yields
/// `dir/a.txt` and a plain file yields its own file name.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<InputFile>> {
    let mut files = Vec::new();
    for input in inputs {
        let root = archive_root(input);
        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(input).to_path_buf();
                TarError::Path { source: e.into(), path }
            })?;
            if !entry.file_type().is_file() && !(entry.depth() == 0 && entry.path().is_file()) {
                debug!(path = %entry.path().display(), "skipping non-regular file");
                continue;
            }
            files.push(load_file(entry.path(), root)?);
        }
    }
    Ok(files)
}

fn load_file(path: &Path, root: &Path) -> Result<InputFile> {
    let path_err = |source| TarError::Path { source, path: path.to_path_buf() };
    let meta = fs::metadata(path).map_err(path_err)?;
    let content = fs::read(path).map_err(path_err)?;
    let name = entry_name(path.strip_prefix(root).unwrap_or(path)).ok_or_else(|| TarError::Path {
        source: io::Error::new(io::ErrorKind::InvalidData, "file name is not valid UTF-8"),
        path: path.to_path_buf(),
    })?;
    debug!(name = %name, size = content.len(), "loaded input");
    Ok(InputFile { name, content, mode: fsx::mode_string(&meta), mtime: fsx::mtime_secs(&meta) })
}

/// The directory entry names are made relative to.
fn archive_root(input: &Path) -> &Path {
    match (input.file_name(), input.parent()) {
        (Some(_), Some(parent)) => parent,
        _ => input,
    }
}

/// Joins the normal components of `rel` with `/`. Returns `None` if any
/// component is not valid UTF-8.
fn entry_name(rel: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            parts.push(part.to_str()?);
        }
    }
    Some(parts.join("/"))
}
