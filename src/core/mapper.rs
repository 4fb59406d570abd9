//! Loading the inventory of defined SQL statements.
//!
//! The inventory comes from one of three places:
//! - a directory, walked for `*.xml` mapper files
//! - a single mapper `.xml` file
//! - any other file, read as a plain list with one identifier per line
//!
//! A mapper file has a root element carrying a `namespace` attribute and
//! `select`/`insert`/`update`/`delete` elements (at any depth) carrying an
//! `id`. A malformed mapper only costs its own statements.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt, fs,
    path::{Path, PathBuf},
};

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use walkdir::WalkDir;

use super::walker::display_path;
use crate::{
    diagnostics::{Diagnostic, FileReadWarning, MapperParseWarning, SubtreeAccessWarning},
    error::{Result, SqlidError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"select" => Some(Self::Select),
            b"insert" => Some(Self::Insert),
            b"update" => Some(Self::Update),
            b"delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::Select => write!(f, "select"),
            StatementKind::Insert => write!(f, "insert"),
            StatementKind::Update => write!(f, "update"),
            StatementKind::Delete => write!(f, "delete"),
        }
    }
}

/// One defined statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlStatement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub id: String,
    /// Unknown for entries read from a plain list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<StatementKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_type: Option<String>,
    /// File the statement was defined in, relative to the inventory root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SqlStatement {
    /// `namespace.id`, or the bare id when there is no namespace.
    pub fn qualified_id(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.id),
            None => self.id.clone(),
        }
    }

    /// Entry from a plain list. The namespace is everything before the last `.`.
    fn from_listed(identifier: &str, source: Option<&str>) -> Self {
        let (namespace, id) = match identifier.rsplit_once('.') {
            Some((ns, id)) if !ns.is_empty() && !id.is_empty() => {
                (Some(ns.to_string()), id.to_string())
            }
            _ => (None, identifier.to_string()),
        };
        Self {
            namespace,
            id,
            kind: None,
            parameter_type: None,
            result_type: None,
            source: source.map(str::to_string),
        }
    }
}

/// The defined statements plus the lookups verification needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinedInventory {
    statements: BTreeMap<String, SqlStatement>,
    bare_ids: BTreeSet<String>,
    namespaces: BTreeSet<String>,
}

impl DefinedInventory {
    /// Build from statements. The first definition of a qualified id wins.
    pub fn from_statements(statements: impl IntoIterator<Item = SqlStatement>) -> Self {
        let mut inventory = Self::default();
        for statement in statements {
            inventory.insert(statement);
        }
        inventory
    }

    /// Parse a plain identifier list: one per line, `#` comments and blank
    /// lines ignored.
    pub fn from_ids(text: &str) -> Self {
        Self::from_statements(parse_id_list(text, None))
    }

    fn insert(&mut self, statement: SqlStatement) {
        let qualified = statement.qualified_id();
        if self.statements.contains_key(&qualified) {
            tracing::debug!(id = %qualified, source = ?statement.source, "duplicate definition ignored");
            return;
        }
        self.bare_ids.insert(statement.id.clone());
        if let Some(ns) = &statement.namespace {
            self.namespaces.insert(ns.clone());
        }
        self.statements.insert(qualified, statement);
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn contains(&self, qualified_id: &str) -> bool {
        self.statements.contains_key(qualified_id)
    }

    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains(namespace)
    }

    pub fn has_bare_id(&self, id: &str) -> bool {
        self.bare_ids.contains(id)
    }

    /// Qualified ids in lexical order.
    pub fn qualified_ids(&self) -> impl Iterator<Item = &str> {
        self.statements.keys().map(String::as_str)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.iter().map(String::as_str)
    }

    /// Statements ordered by qualified id.
    pub fn statements(&self) -> impl Iterator<Item = &SqlStatement> {
        self.statements.values()
    }

    pub fn get(&self, qualified_id: &str) -> Option<&SqlStatement> {
        self.statements.get(qualified_id)
    }
}

/// An inventory plus the problems met while loading it.
#[derive(Debug, Default)]
pub struct InventoryLoad {
    pub inventory: DefinedInventory,
    pub diagnostics: Vec<Diagnostic>,
    /// Mapper files that parsed successfully.
    pub files_loaded: usize,
}

/// Load the inventory at `path`.
///
/// Only a missing path, or an unreadable plain list, is fatal.
pub fn load_inventory(path: &Path) -> Result<InventoryLoad> {
    if !path.exists() {
        return Err(SqlidError::InventoryNotFound {
            path: path.to_path_buf(),
        });
    }

    let load = if path.is_dir() {
        load_mapper_dir(path)
    } else if is_xml(path) {
        let base = path.parent().unwrap_or(path);
        collect_mapper_files(base, vec![path.to_path_buf()], Vec::new())
    } else {
        let text = fs::read_to_string(path)?;
        let source = path.file_name().map(|n| n.to_string_lossy().into_owned());
        InventoryLoad {
            inventory: DefinedInventory::from_statements(parse_id_list(&text, source.as_deref())),
            diagnostics: Vec::new(),
            files_loaded: 1,
        }
    };

    tracing::info!(
        path = %path.display(),
        statements = load.inventory.len(),
        files = load.files_loaded,
        warnings = load.diagnostics.len(),
        "inventory loaded"
    );

    Ok(load)
}

fn is_xml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}

fn load_mapper_dir(dir: &Path) -> InventoryLoad {
    let mut files = Vec::new();
    let mut diagnostics = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_xml(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => {
                let path = e
                    .path()
                    .map_or_else(|| ".".to_string(), |p| display_path(dir, p));
                diagnostics.push(
                    SubtreeAccessWarning {
                        path,
                        error: e.to_string(),
                    }
                    .into(),
                );
            }
        }
    }

    collect_mapper_files(dir, files, diagnostics)
}

fn collect_mapper_files(
    base: &Path,
    files: Vec<PathBuf>,
    mut diagnostics: Vec<Diagnostic>,
) -> InventoryLoad {
    // Parsed in parallel, merged in walk order so "first definition wins" is stable.
    let parsed: Vec<Result<Vec<SqlStatement>, Diagnostic>> = files
        .par_iter()
        .map(|file| load_mapper_file(base, file))
        .collect();

    let mut inventory = DefinedInventory::default();
    let mut files_loaded = 0;
    for result in parsed {
        match result {
            Ok(statements) => {
                files_loaded += 1;
                for statement in statements {
                    inventory.insert(statement);
                }
            }
            Err(diagnostic) => diagnostics.push(diagnostic),
        }
    }

    InventoryLoad {
        inventory,
        diagnostics,
        files_loaded,
    }
}

fn load_mapper_file(
    base: &Path,
    file: &Path,
) -> Result<Vec<SqlStatement>, Diagnostic> {
    let rel = display_path(base, file);

    let content = fs::read_to_string(file).map_err(|e| {
        Diagnostic::from(FileReadWarning {
            path: rel.clone(),
            error: e.to_string(),
        })
    })?;

    let mut statements = parse_mapper_xml(&content).map_err(|e| {
        tracing::debug!(file = %rel, error = %e, "mapper parse failed");
        Diagnostic::from(MapperParseWarning {
            path: rel.clone(),
            error: e.to_string(),
        })
    })?;

    tracing::debug!(file = %rel, statements = statements.len(), "mapper loaded");
    for statement in &mut statements {
        statement.source = Some(rel.clone());
    }
    Ok(statements)
}

fn parse_id_list(text: &str, source: Option<&str>) -> Vec<SqlStatement> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| SqlStatement::from_listed(line, source))
        .collect()
}

#[derive(Debug, Error)]
pub enum MapperParseError {
    #[error("{message} at byte {position}")]
    Xml { message: String, position: u64 },

    #[error("unclosed element <{0}> at end of document")]
    Unclosed(String),

    #[error("no root element")]
    NoRoot,
}

/// Parse one mapper document into its statements, in document order.
///
/// Statement elements without an `id` are skipped.
pub fn parse_mapper_xml(content: &str) -> Result<Vec<SqlStatement>, MapperParseError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut namespace: Option<String> = None;
    let mut statements = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut seen_root = false;

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader.read_event().map_err(|e| MapperParseError::Xml {
            message: e.to_string(),
            position,
        })?;

        match event {
            Event::Start(e) => {
                if open.is_empty() {
                    seen_root = true;
                    namespace = attribute(&e, "namespace", position)?;
                }
                if let Some(statement) = statement(&e, namespace.as_deref(), position)? {
                    statements.push(statement);
                }
                open.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Event::Empty(e) => {
                if open.is_empty() {
                    seen_root = true;
                    namespace = attribute(&e, "namespace", position)?;
                }
                if let Some(statement) = statement(&e, namespace.as_deref(), position)? {
                    statements.push(statement);
                }
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.pop() {
        return Err(MapperParseError::Unclosed(unclosed));
    }
    if !seen_root {
        return Err(MapperParseError::NoRoot);
    }

    Ok(statements)
}

fn statement(
    e: &BytesStart<'_>,
    namespace: Option<&str>,
    position: u64,
) -> Result<Option<SqlStatement>, MapperParseError> {
    let Some(kind) = StatementKind::from_tag(e.name().as_ref()) else {
        return Ok(None);
    };
    let Some(id) = attribute(e, "id", position)? else {
        tracing::debug!(kind = %kind, "statement without id skipped");
        return Ok(None);
    };

    Ok(Some(SqlStatement {
        namespace: namespace.map(str::to_string),
        id,
        kind: Some(kind),
        parameter_type: attribute(e, "parameterType", position)?,
        result_type: attribute(e, "resultType", position)?,
        source: None,
    }))
}

/// Unescaped attribute value; empty values count as absent.
fn attribute(
    e: &BytesStart<'_>,
    name: &str,
    position: u64,
) -> Result<Option<String>, MapperParseError> {
    let xml_error = |message: String| MapperParseError::Xml { message, position };

    let Some(attr) = e
        .try_get_attribute(name)
        .map_err(|err| xml_error(err.to_string()))?
    else {
        return Ok(None);
    };
    let value = attr
        .unescape_value()
        .map_err(|err| xml_error(err.to_string()))?;

    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}
