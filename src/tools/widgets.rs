//! Touch Bar, menubar and Stream Deck widget tools.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use super::args;
use super::{confirm, Tool, ToolContext};
use crate::client::Params;
use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::protocol::{ToolAnnotations, ToolCallResult, ToolDefinition};

pub(super) fn tools() -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(UpdateWidgetTool), Arc::new(RefreshWidgetTool)]
}

/// Where a widget lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetType {
    #[default]
    TouchBar,
    Menubar,
    StreamDeck,
}

impl WidgetType {
    /// Update endpoint for this widget type.
    pub fn endpoint(self) -> &'static str {
        match self {
            WidgetType::TouchBar => "update_touch_bar_widget",
            WidgetType::Menubar => "update_menubar_item",
            WidgetType::StreamDeck => "update_stream_deck_widget",
        }
    }
}

/// Temporarily change a widget's appearance.
pub struct UpdateWidgetTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateWidgetArgs {
    #[serde(deserialize_with = "args::trimmed")]
    uuid: String,
    #[serde(default)]
    widget_type: WidgetType,
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    text: Option<String>,
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    icon_path: Option<String>,
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    icon_data: Option<String>,
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    background_color: Option<String>,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for UpdateWidgetTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_update_widget".to_string(),
            description: "Update the display of a Touch Bar, menubar or Stream Deck widget \
                without changing its configuration."
                .to_string(),
            input_schema: args::object_schema(
                json!({
                    "uuid": args::uuid_schema("UUID of the widget to update"),
                    "widget_type": {
                        "type": "string",
                        "enum": ["touch_bar", "menubar", "stream_deck"],
                        "default": "touch_bar",
                        "description": "Type of widget"
                    },
                    "text": {"type": "string", "description": "New text to display"},
                    "icon_path": {"type": "string", "description": "Path to an icon file"},
                    "icon_data": {"type": "string", "description": "Base64-encoded icon data"},
                    "background_color": {
                        "type": "string",
                        "description": "Background color as 'R,G,B,A' (e.g. '200,100,100,255')"
                    }
                }),
                &["uuid"],
            ),
            annotations: Some(ToolAnnotations::mutating("Update Widget").idempotent()),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: UpdateWidgetArgs = args::parse(arguments)?;
        args::require_uuid("uuid", &args.uuid)?;
        let params = Params::new()
            .set("uuid", &args.uuid)
            .set_opt("text", args.text)
            .set_opt("icon_path", args.icon_path)
            .set_opt("icon_data", args.icon_data)
            .set_opt("background_color", args.background_color);

        let response = context
            .request(args.widget_type.endpoint(), params, args.connection.as_ref())
            .await;
        Ok(confirm(
            response,
            format!("Widget {} updated successfully.", args.uuid),
        ))
    }
}

/// Re-run a script widget.
pub struct RefreshWidgetTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RefreshWidgetArgs {
    #[serde(deserialize_with = "args::trimmed")]
    uuid: String,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for RefreshWidgetTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_refresh_widget".to_string(),
            description: "Refresh a script widget so its scripts run again.".to_string(),
            input_schema: args::object_schema(
                json!({"uuid": args::uuid_schema("UUID of the widget to refresh")}),
                &["uuid"],
            ),
            annotations: Some(ToolAnnotations::mutating("Refresh Widget").idempotent()),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: RefreshWidgetArgs = args::parse(arguments)?;
        args::require_uuid("uuid", &args.uuid)?;
        let response = context
            .request(
                "refresh_widget",
                Params::new().set("uuid", &args.uuid),
                args.connection.as_ref(),
            )
            .await;
        Ok(confirm(response, format!("Widget {} refreshed.", args.uuid)))
    }
}
