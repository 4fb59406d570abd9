//! Lazy enumeration of service files under a scan root.

use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::{DirEntry, WalkDir};

use crate::{
    config::is_glob_pattern,
    diagnostics::SubtreeAccessWarning,
    error::{Result, SqlidError},
};

/// Walker settings taken from the configuration.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub file_suffix: String,
    pub ignores: Vec<String>,
    pub follow_links: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            file_suffix: crate::config::DEFAULT_FILE_SUFFIX.to_string(),
            ignores: Vec::new(),
            follow_links: false,
        }
    }
}

/// One item of the walk: either a file to process, or a subtree that could
/// not be visited.
#[derive(Debug)]
pub enum WalkEntry {
    File(PathBuf),
    Skipped(SubtreeAccessWarning),
}

pub struct FileTreeWalker {
    root: PathBuf,
    file_suffix: String,
    literal_ignores: Vec<PathBuf>,
    glob_ignores: Vec<Pattern>,
    follow_links: bool,
}

impl FileTreeWalker {
    /// Fails with `PathNotFound` if `root` does not exist or is not a directory.
    pub fn new(root: &Path, options: &WalkOptions) -> Result<Self> {
        if !root.is_dir() {
            return Err(SqlidError::PathNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut literal_ignores = Vec::new();
        let mut glob_ignores = Vec::new();
        for p in &options.ignores {
            if is_glob_pattern(p) {
                let pattern = Pattern::new(p).map_err(|e| SqlidError::pattern("ignores", p, e))?;
                glob_ignores.push(pattern);
            } else {
                literal_ignores.push(root.join(p));
            }
        }

        Ok(Self {
            root: root.to_path_buf(),
            file_suffix: options.file_suffix.clone(),
            literal_ignores,
            glob_ignores,
            follow_links: options.follow_links,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily walk the tree, yielding matching files and skipped subtrees.
    ///
    /// Ignored directories are pruned, not descended into.
    pub fn entries(&self) -> impl Iterator<Item = WalkEntry> + Send + '_ {
        WalkDir::new(&self.root)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_ignored(entry.path()))
            .filter_map(|entry| match entry {
                Ok(entry) => self.accept(&entry).then(|| WalkEntry::File(entry.into_path())),
                Err(err) => {
                    let path = err
                        .path()
                        .map(|p| display_path(&self.root, p))
                        .unwrap_or_else(|| display_path(&self.root, &self.root));
                    let error = match err.loop_ancestor() {
                        Some(ancestor) => format!(
                            "symbolic link loop back to {}",
                            display_path(&self.root, ancestor)
                        ),
                        None => err
                            .io_error()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| err.to_string()),
                    };
                    tracing::debug!(%path, %error, "skipping subtree");
                    Some(WalkEntry::Skipped(SubtreeAccessWarning { path, error }))
                }
            })
    }

    /// Regular files, and special files such as FIFOs, which the read timeout
    /// guards. Unfollowed symlinks are skipped.
    fn accept(&self, entry: &DirEntry) -> bool {
        let file_type = entry.file_type();
        !file_type.is_dir()
            && !file_type.is_symlink()
            && has_suffix(entry.path(), &self.file_suffix)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        if self
            .literal_ignores
            .iter()
            .any(|ignore_path| path.starts_with(ignore_path))
        {
            return true;
        }

        let full = path.to_string_lossy();
        let relative = display_path(&self.root, path);
        self.glob_ignores
            .iter()
            .any(|p| p.matches(&full) || p.matches(&relative))
    }
}

/// Check whether the file name ends with the configured suffix.
fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(suffix))
        .unwrap_or(false)
}

/// Path relative to `root` for display, or the full path if it lies outside.
pub fn display_path(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.to_string_lossy().into_owned(),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}
