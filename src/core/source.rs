//! Reading a source file once, with an optional upper bound on how long the
//! read may take.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::Duration,
};

/// A file path plus its text, read once and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Read `path` as UTF-8 text.
    ///
    /// With a timeout, the read runs on a helper thread; if it does not finish
    /// in time the call returns `ErrorKind::TimedOut` and the helper thread is
    /// left to finish on its own. That costs one short-lived thread per file,
    /// which is noticeable on very large trees on local disks; a `null`
    /// `readTimeoutMs` reads on the worker thread directly.
    pub fn read(path: &Path, timeout: Option<Duration>) -> io::Result<Self> {
        let content = match timeout {
            Some(timeout) => read_with_timeout(path, timeout)?,
            None => fs::read_to_string(path)?,
        };
        Ok(Self::new(path, content))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

fn read_with_timeout(path: &Path, timeout: Duration) -> io::Result<String> {
    let (tx, rx) = mpsc::channel();
    let owned = path.to_path_buf();

    thread::Builder::new()
        .name("sqlid-read".to_string())
        .spawn(move || {
            // The receiver may have given up already.
            let _ = tx.send(fs::read_to_string(&owned));
        })?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("read timed out after {} ms", timeout.as_millis()),
        )),
        Err(RecvTimeoutError::Disconnected) => {
            Err(io::Error::other("reader thread exited without a result"))
        }
    }
}
