//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes scanning and checking to AI coding agents as MCP tools over stdio.
//!
//! ## Module Structure
//!
//! - `server`: Tool router and server entry point
//! - `types`: Tool parameters and results

mod server;
pub mod types;

pub use server::{SqlidMcpServer, run_server};
