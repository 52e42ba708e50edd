//! Per-invocation stdout/stderr capture files (§4.F).
//!
//! The daemon creates the files; the worker redirects its own file
//! descriptors onto them for the duration of one hook call, so that
//! subprocesses the backend spawns are captured too. Files persist past
//! the response — ownership transfers to the client once their paths are
//! emitted.

use crate::Error;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tempfile::Builder;

static INVOCATION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// The absolute paths of one invocation's capture files.
#[derive(Debug, Clone)]
pub struct CapturedStreams {
    pub stdout: PathBuf,
    pub stderr: PathBuf,
}

/// Creates one fresh, empty file named `hookd-<pid>-<n>-<suffix>` under the
/// system temp directory and hands ownership to the caller — the file
/// outlives this process's handle to it (see the `persist` rationale on
/// [`create`]).
fn create_named(pid: u32, n: u64, suffix: &str) -> Result<PathBuf, Error> {
    let named = Builder::new()
        .prefix(&format!("hookd-{pid}-{n}-"))
        .suffix(suffix)
        .rand_bytes(0)
        .tempfile_in(std::env::temp_dir())?;
    let (_file, path) = named.keep().map_err(|err| Error::Io(err.error))?;
    Ok(fs_err::canonicalize(path)?)
}

/// Creates a fresh, empty, uniquely-named pair of capture files under the
/// system temp directory. Built with `tempfile::Builder` rather than
/// `NamedTempFile`'s default random suffix so the path stays predictable
/// (`hookd-<pid>-<counter>-stdout`/`-stderr`), then `keep()`d immediately —
/// the file must survive past this process's handle, since the client
/// reads it after the daemon has moved on to the next request.
pub fn create(pid: u32) -> Result<CapturedStreams, Error> {
    let n = INVOCATION_COUNTER.fetch_add(1, Ordering::Relaxed);
    Ok(CapturedStreams {
        stdout: create_named(pid, n, "stdout")?,
        stderr: create_named(pid, n, "stderr")?,
    })
}

/// Writes a traceback to a fresh file next to the capture files and
/// returns its path, or `None` if there was nothing to write.
pub fn write_traceback(pid: u32, traceback: Option<&str>) -> Result<Option<PathBuf>, Error> {
    let Some(traceback) = traceback else {
        return Ok(None);
    };
    let n = INVOCATION_COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = create_named(pid, n, "traceback")?;
    fs_err::write(&path, traceback)?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_unique_existing_files() {
        let a = create(std::process::id()).unwrap();
        let b = create(std::process::id()).unwrap();
        assert_ne!(a.stdout, b.stdout);
        assert_ne!(a.stderr, b.stderr);
        assert!(a.stdout.is_file());
        assert!(a.stderr.is_file());
        assert_eq!(fs_err::read_to_string(&a.stdout).unwrap(), "");
    }

    #[test]
    fn no_traceback_file_when_absent() {
        assert!(write_traceback(std::process::id(), None).unwrap().is_none());
    }

    #[test]
    fn writes_traceback_file_when_present() {
        let path = write_traceback(std::process::id(), Some("Traceback...\nOh no\n"))
            .unwrap()
            .unwrap();
        assert_eq!(fs_err::read_to_string(&path).unwrap(), "Traceback...\nOh no\n");
    }
}
