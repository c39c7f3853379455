//! Clipboard tools.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use super::args;
use super::{confirm, Tool, ToolContext};
use crate::client::Params;
use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::protocol::{ToolAnnotations, ToolCallResult, ToolDefinition};

/// Pasteboard type used when none is given.
pub const DEFAULT_PASTEBOARD_TYPE: &str = "NSPasteboardTypeString";

pub(super) fn tools() -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(GetClipboardTool), Arc::new(SetClipboardTool)]
}

fn default_format() -> String {
    DEFAULT_PASTEBOARD_TYPE.to_string()
}

fn format_schema() -> Value {
    json!({
        "type": "string",
        "default": DEFAULT_PASTEBOARD_TYPE,
        "description": "Pasteboard type (e.g. NSPasteboardTypeString, NSPasteboardTypeHTML, public.png)"
    })
}

/// Read the clipboard.
pub struct GetClipboardTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetClipboardArgs {
    #[serde(default = "default_format", deserialize_with = "args::trimmed")]
    format: String,
    #[serde(default)]
    as_base64: bool,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for GetClipboardTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_get_clipboard".to_string(),
            description: "Get the current clipboard content in a given format, optionally as \
                base64 (for images)."
                .to_string(),
            input_schema: args::object_schema(
                json!({
                    "format": format_schema(),
                    "as_base64": {
                        "type": "boolean",
                        "default": false,
                        "description": "Return the content base64-encoded"
                    }
                }),
                &[],
            ),
            annotations: Some(ToolAnnotations::read_only("Get Clipboard Content")),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: GetClipboardArgs = args::parse(arguments)?;
        let params = Params::new()
            .set("format", &args.format)
            .flag("asBase64", args.as_base64);

        let response = context
            .request("get_clipboard_content", params, args.connection.as_ref())
            .await;
        Ok(ToolCallResult::text(response))
    }
}

/// Write the clipboard.
pub struct SetClipboardTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SetClipboardArgs {
    content: String,
    #[serde(default = "default_format", deserialize_with = "args::trimmed")]
    format: String,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for SetClipboardTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_set_clipboard".to_string(),
            description: "Set the clipboard content (plain text, HTML, ...).".to_string(),
            input_schema: args::object_schema(
                json!({
                    "content": {"type": "string", "description": "Content to place on the clipboard"},
                    "format": format_schema()
                }),
                &["content"],
            ),
            annotations: Some(ToolAnnotations::mutating("Set Clipboard Content").idempotent()),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: SetClipboardArgs = args::parse(arguments)?;
        let params = Params::new()
            .set("content", &args.content)
            .set("format", &args.format);

        let response = context
            .request("set_clipboard_content", params, args.connection.as_ref())
            .await;
        Ok(confirm(response, "Clipboard content set successfully."))
    }
}
