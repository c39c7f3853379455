//! Tool definitions and registry for the MCP server.
//!
//! Each submodule groups the tools for one area of BetterTouchTool and
//! exposes them through a `tools()` constructor; [`ToolRegistry`] collects
//! them all.

pub mod args;

mod actions;
mod clipboard;
mod floating_menus;
mod presets;
mod reference;
mod triggers;
mod variables;
mod widgets;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::client::{self, Dispatcher, Params};
use crate::config::ConnectionConfig;
use crate::error::{Error, Result};
use crate::format;
use crate::protocol::{ToolCallResult, ToolDefinition};
use crate::reference::ReferenceIndex;

use args::ResponseFormat;

/// Tool trait for implementing MCP tools.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool definition.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given arguments.
    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult>;
}

/// Shared, read-only state handed to every tool call.
pub struct ToolContext {
    /// Connection used when a call carries no `connection` override.
    pub connection: ConnectionConfig,
    /// Transport selection and timeouts.
    pub dispatcher: Dispatcher,
    /// Reference documentation index.
    pub reference: ReferenceIndex,
}

impl ToolContext {
    /// Create a tool context.
    pub fn new(connection: ConnectionConfig, dispatcher: Dispatcher, reference: ReferenceIndex) -> Self {
        Self {
            connection,
            dispatcher,
            reference,
        }
    }

    /// Send a request to BTT, honouring a per-call connection override.
    pub async fn request(
        &self,
        endpoint: &str,
        params: Params,
        connection: Option<&ConnectionConfig>,
    ) -> String {
        let connection = connection.unwrap_or(&self.connection);
        self.dispatcher.request(endpoint, params, connection).await
    }
}

/// Empty reply means success: substitute `message`, otherwise pass BTT's
/// reply (including errors) through.
pub(crate) fn reply_or(response: String, message: impl Into<String>) -> ToolCallResult {
    if response.trim().is_empty() {
        ToolCallResult::text(message)
    } else {
        ToolCallResult::text(response)
    }
}

/// Pass dispatcher errors through, otherwise report `message`.
pub(crate) fn confirm(response: String, message: impl Into<String>) -> ToolCallResult {
    if client::is_error(&response) {
        ToolCallResult::text(response)
    } else {
        ToolCallResult::text(message)
    }
}

/// Render a JSON reply as markdown, or pass it through raw.
pub(crate) fn render_json(
    response: String,
    response_format: ResponseFormat,
    render: impl FnOnce(Value) -> String,
) -> ToolCallResult {
    if client::is_error(&response) || response_format == ResponseFormat::Json {
        return ToolCallResult::text(response);
    }
    match serde_json::from_str::<Value>(&response) {
        Ok(value) => ToolCallResult::text(render(value)),
        Err(e) => {
            tracing::debug!("unparseable BTT response: {}", e);
            ToolCallResult::text(format!("Error parsing response: {}", response))
        }
    }
}

/// Render a list-of-triggers reply.
pub(crate) fn render_triggers(
    response: String,
    response_format: ResponseFormat,
    title: &str,
) -> ToolCallResult {
    render_json(response, response_format, |value| {
        format::format_triggers_list(&format::as_list(value), title)
    })
}

/// Registry of available tools.
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
    context: Arc<ToolContext>,
}

impl ToolRegistry {
    /// Create a registry holding every built-in tool.
    pub fn new(context: ToolContext) -> Self {
        let mut registry = Self {
            tools: BTreeMap::new(),
            context: Arc::new(context),
        };

        let builtin = triggers::tools()
            .into_iter()
            .chain(actions::tools())
            .chain(variables::tools())
            .chain(widgets::tools())
            .chain(clipboard::tools())
            .chain(presets::tools())
            .chain(floating_menus::tools())
            .chain(reference::tools());

        for tool in builtin {
            registry.register(tool);
        }
        registry
    }

    /// Get tool definitions, sorted by name.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, arguments: Value) -> Result<ToolCallResult> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| Error::ToolNotFound(name.to_string()))?;

        tracing::debug!(tool = name, "executing tool");
        tool.execute(arguments, &self.context).await
    }

    /// Register a tool, replacing any tool of the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name;
        self.tools.insert(name, tool);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;

    use super::*;

    /// A context whose BTT connection points at a closed local port, and
    /// whose reference index reads the bundled docs.
    pub fn context() -> ToolContext {
        let connection = ConnectionConfig {
            port: 1,
            ..Default::default()
        };
        let dispatcher = Dispatcher::new().with_timeout(Duration::from_secs(2));
        let reference = ReferenceIndex::new(crate::reference::default_docs_dir()).unwrap();
        ToolContext::new(connection, dispatcher, reference)
    }

    pub fn registry() -> ToolRegistry {
        ToolRegistry::new(context())
    }

    pub const UUID: &str = "12345678-1234-1234-1234-123456789012";
}
