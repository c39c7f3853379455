//! # btt-mcp
//!
//! MCP (Model Context Protocol) server for BetterTouchTool automation.
//!
//! The server exposes BetterTouchTool's scripting interface as MCP tools so
//! AI assistants can inspect and edit triggers, run actions, manage
//! variables, widgets, presets and floating menus, and look up the bundled
//! trigger/action reference before writing BTT JSON.
//!
//! ## Features
//!
//! - **MCP-compliant**: JSON-RPC 2.0 over stdio (standard MCP transport)
//! - **Two transports**: the BTT webserver over HTTP, or the local `bttcli`
//! - **Reference lookup**: keyword-scored sections of the bundled docs
//! - **Readable output**: trigger and menu listings rendered as markdown
//!
//! ## Usage with Claude Desktop
//!
//! Add to `claude_desktop_config.json`:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "btt": {
//!       "command": "btt-mcp",
//!       "env": { "BTT_PORT": "12345" }
//!     }
//!   }
//! }
//! ```
//!
//! ## Transport errors
//!
//! Failures talking to BTT never abort a tool call. They come back as tool
//! output starting with `Error:` and the result is flagged `isError`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod protocol;
pub mod reference;
pub mod server;
pub mod tools;

pub use client::{Dispatcher, Params};
pub use config::ConnectionConfig;
pub use error::{Error, Result};
pub use protocol::{JsonRpcRequest, JsonRpcResponse, McpMessage};
pub use reference::ReferenceIndex;
pub use server::McpServer;
pub use tools::{Tool, ToolContext, ToolRegistry};
