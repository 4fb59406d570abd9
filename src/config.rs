use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SqlidError;

pub const CONFIG_FILE_NAME: &str = ".sqlidrc.json";

pub const DEFAULT_FILE_SUFFIX: &str = "Service.java";
pub const DEFAULT_CLASS_MARKER: &str = "@Service";
pub const DEFAULT_RECEIVER: &str = "sqlSession";
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 30_000;

/// Name of the capture group a call pattern must define for the identifier.
pub const ID_GROUP: &str = "id";
/// Name of the optional capture group holding the invoked method.
pub const METHOD_GROUP: &str = "method";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Only files whose name ends with this suffix are considered.
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,
    /// Regex that marks a file as a business-logic unit.
    #[serde(default = "default_class_marker")]
    pub class_marker: String,
    /// Receiver token of the query-execution call (`<receiver>.<method>("id"`).
    #[serde(default = "default_receiver")]
    pub receiver: String,
    /// Full call-site regex; overrides `receiver` when set.
    #[serde(default)]
    pub call_pattern: Option<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub follow_links: bool,
    /// Record which files reference each identifier.
    #[serde(default)]
    pub backrefs: bool,
    /// Per-file read timeout in milliseconds; `null` or `0` disables it.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: Option<u64>,
    /// Worker count; 0 means one per CPU core.
    #[serde(default)]
    pub jobs: usize,
    /// Default inventory location for `check`, relative to the scan root.
    #[serde(default)]
    pub defined_path: Option<String>,
}

fn default_file_suffix() -> String {
    DEFAULT_FILE_SUFFIX.to_string()
}

fn default_class_marker() -> String {
    DEFAULT_CLASS_MARKER.to_string()
}

fn default_receiver() -> String {
    DEFAULT_RECEIVER.to_string()
}

fn default_read_timeout_ms() -> Option<u64> {
    Some(DEFAULT_READ_TIMEOUT_MS)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_suffix: default_file_suffix(),
            class_marker: default_class_marker(),
            receiver: default_receiver(),
            call_pattern: None,
            ignores: Vec::new(),
            follow_links: false,
            backrefs: false,
            read_timeout_ms: default_read_timeout_ms(),
            jobs: 0,
            defined_path: None,
        }
    }
}

impl Config {
    /// Reject a configuration that cannot drive a scan.
    ///
    /// Compiles every pattern once so a malformed one fails before any file
    /// is touched.
    pub fn validate(&self) -> Result<(), SqlidError> {
        for pattern in &self.ignores {
            if is_glob_pattern(pattern) {
                Pattern::new(pattern).map_err(|e| SqlidError::pattern("ignores", pattern, e))?;
            }
        }

        if self.file_suffix.is_empty() {
            return Err(SqlidError::pattern(
                "fileSuffix",
                "",
                "suffix must not be empty",
            ));
        }

        Regex::new(&self.class_marker)
            .map_err(|e| SqlidError::pattern("classMarker", &self.class_marker, e))?;

        self.call_regex()?;

        Ok(())
    }

    /// Build the call-site regex from `callPattern`, or from `receiver`.
    pub fn call_regex(&self) -> Result<Regex, SqlidError> {
        match &self.call_pattern {
            Some(pattern) => {
                let re = Regex::new(pattern)
                    .map_err(|e| SqlidError::pattern("callPattern", pattern, e))?;
                if !re.capture_names().flatten().any(|name| name == ID_GROUP) {
                    return Err(SqlidError::pattern(
                        "callPattern",
                        pattern,
                        format!("missing named capture group '(?P<{}>...)'", ID_GROUP),
                    ));
                }
                Ok(re)
            }
            None => {
                if self.receiver.is_empty() {
                    return Err(SqlidError::pattern(
                        "receiver",
                        "",
                        "receiver must not be empty",
                    ));
                }
                let pattern = receiver_call_pattern(&self.receiver);
                Regex::new(&pattern).map_err(|e| SqlidError::pattern("receiver", pattern, e))
            }
        }
    }
}

/// `<receiver>.<method>("<id>"` with the receiver taken literally.
pub fn receiver_call_pattern(receiver: &str) -> String {
    format!(
        r#"{}\.(?P<{}>\w+)\("(?P<{}>[^"]+)""#,
        regex::escape(receiver),
        METHOD_GROUP,
        ID_GROUP
    )
}

/// `*` or `?` makes an ignore entry a glob; anything else is a path prefix
/// relative to the scan root.
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to serialize default configuration")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Effective configuration and its origin.
pub struct ConfigLoadResult {
    pub config: Config,
    /// False when no `.sqlidrc.json` was found and the defaults apply.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
