//! File I/O with lenient reads and strict writes
//!
//! Every read in the store goes through `read_json_or_default` or
//! `read_text_or_empty`: a missing, unreadable or corrupt file is reported at
//! `warn`/`debug` level and treated as empty. Every write goes through
//! `write_json` / `write_text` and returns its error to the caller.
//!
//! Writes either overwrite the target in place (the default) or, with
//! `WriteOptions::atomic`, go through write-fsync-rename of a uniquely named
//! temp file so a reader never observes a half-written file.

use schooldesk_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// How files are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Write to a temp file and rename over the target
    pub atomic: bool,
    /// Pretty-print JSON with two-space indentation
    pub pretty: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: false,
            pretty: true,
        }
    }
}

/// Read and parse a JSON file, falling back to `T::default()`
///
/// Never fails: absence is logged at `debug`, any other read or parse failure
/// at `warn`.
pub fn read_json_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(target: "schooldesk::storage", path = %path.display(), "File missing, reading as empty");
            return T::default();
        }
        Err(e) => {
            warn!(target: "schooldesk::storage", path = %path.display(), error = %e, "Read failed, reading as empty");
            return T::default();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(e) => {
            warn!(target: "schooldesk::storage", path = %path.display(), error = %e, "Unparseable JSON, reading as empty");
            T::default()
        }
    }
}

/// Serialize `value` as JSON and write it to `path`
pub fn write_json<T>(path: &Path, value: &T, opts: WriteOptions) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let bytes = if opts.pretty {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    };
    write_bytes(path, &bytes, opts)
}

/// Read a UTF-8 text file, returning an empty string on any failure
pub fn read_text_or_empty(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(target: "schooldesk::storage", path = %path.display(), error = %e, "Read failed, reading as empty");
            }
            String::new()
        }
    }
}

/// Write raw text to `path`
pub fn write_text(path: &Path, text: &str, opts: WriteOptions) -> Result<()> {
    write_bytes(path, text.as_bytes(), opts)
}

/// Remove a file, ignoring every failure
///
/// Returns whether a file was actually removed.
pub fn remove_quietly(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(target: "schooldesk::storage", path = %path.display(), error = %e, "Remove failed, ignoring");
            }
            false
        }
    }
}

fn write_bytes(path: &Path, bytes: &[u8], opts: WriteOptions) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    if opts.atomic {
        write_atomic(path, bytes)
    } else {
        fs::write(path, bytes).map_err(Error::from)
    }
}

/// write-fsync-rename through a temp file unique to this call
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(path);

    let result = (|| -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, path)?;

        if let Some(parent) = path.parent() {
            if parent.exists() {
                // Directory fsync is not supported everywhere
                if let Ok(dir) = File::open(parent) {
                    let _ = dir.sync_all();
                }
            }
        }
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::from(e));
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4().simple()))
}
