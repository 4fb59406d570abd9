//! sqlid - SQL statement id auditor for service-layer source trees
//!
//! sqlid walks a source tree, picks out service classes by a marker
//! annotation, and collects the SQL statement ids passed as string literals to
//! query-execution calls (`sqlSession.selectOne("user.getUser", ...)`). The
//! collected ids can be checked against the statements defined in mapper XML
//! files to find undefined references and unused definitions.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Scanning engine and inventory comparison
//! - `diagnostics`: Recoverable per-file and per-subtree warnings
//! - `error`: Fatal error type
//! - `logging`: Tracing subscriber setup
//! - `mcp`: Model Context Protocol server implementation
//! - `output`: Serializable reports shared by the CLI and MCP

pub mod cli;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod mcp;
pub mod output;
