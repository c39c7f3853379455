//! Preset, notification and UI tools.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use super::args::{self, ResponseFormat};
use super::{confirm, render_json, Tool, ToolContext};
use crate::client::Params;
use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::format;
use crate::protocol::{ToolAnnotations, ToolCallResult, ToolDefinition};

pub(super) fn tools() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ExportPresetTool),
        Arc::new(ImportPresetTool),
        Arc::new(GetPresetDetailsTool),
        Arc::new(DisplayNotificationTool),
        Arc::new(RevealInUiTool),
    ]
}

/// BTT expects `"1"`/`"0"` for preset export switches.
fn bit(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

fn default_true() -> bool {
    true
}

/// Export a preset to disk.
pub struct ExportPresetTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExportPresetArgs {
    #[serde(deserialize_with = "args::trimmed")]
    name: String,
    #[serde(deserialize_with = "args::trimmed")]
    output_path: String,
    #[serde(default = "default_true")]
    compress: bool,
    #[serde(default)]
    include_settings: bool,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for ExportPresetTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_export_preset".to_string(),
            description: "Export a BTT preset to a file, for backup or sharing.".to_string(),
            input_schema: args::object_schema(
                json!({
                    "name": {"type": "string", "minLength": 1, "description": "Name of the preset to export"},
                    "output_path": {"type": "string", "description": "Where to write the preset file"},
                    "compress": {"type": "boolean", "default": true, "description": "Compress the exported preset"},
                    "include_settings": {"type": "boolean", "default": false, "description": "Include BTT settings"}
                }),
                &["name", "output_path"],
            ),
            annotations: Some(ToolAnnotations::read_only("Export Preset")),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: ExportPresetArgs = args::parse(arguments)?;
        args::require_non_empty("name", &args.name)?;
        args::require_non_empty("output_path", &args.output_path)?;
        let params = Params::new()
            .set("name", &args.name)
            .set("outputPath", &args.output_path)
            .set("compress", bit(args.compress))
            .set("includeSettings", bit(args.include_settings));

        let response = context
            .request("export_preset", params, args.connection.as_ref())
            .await;
        Ok(confirm(
            response,
            format!("Preset '{}' exported to {}", args.name, args.output_path),
        ))
    }
}

/// Import a preset file.
pub struct ImportPresetTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ImportPresetArgs {
    #[serde(deserialize_with = "args::trimmed")]
    path: String,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for ImportPresetTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_import_preset".to_string(),
            description: "Import a BTT preset from a file.".to_string(),
            input_schema: args::object_schema(
                json!({"path": {"type": "string", "description": "Path to the preset file"}}),
                &["path"],
            ),
            annotations: Some(ToolAnnotations::mutating("Import Preset")),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: ImportPresetArgs = args::parse(arguments)?;
        args::require_non_empty("path", &args.path)?;
        let response = context
            .request(
                "import_preset",
                Params::new().set("path", &args.path),
                args.connection.as_ref(),
            )
            .await;
        Ok(confirm(response, format!("Preset imported from {}", args.path)))
    }
}

/// Show a preset's status.
pub struct GetPresetDetailsTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PresetDetailsArgs {
    #[serde(deserialize_with = "args::trimmed")]
    name: String,
    #[serde(default)]
    response_format: ResponseFormat,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for GetPresetDetailsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_get_preset_details".to_string(),
            description: "Get a preset's status, UUID and visibility.".to_string(),
            input_schema: args::object_schema(
                json!({
                    "name": {"type": "string", "minLength": 1, "description": "Name of the preset"},
                    "response_format": args::response_format_schema()
                }),
                &["name"],
            ),
            annotations: Some(ToolAnnotations::read_only("Get Preset Details")),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: PresetDetailsArgs = args::parse(arguments)?;
        args::require_non_empty("name", &args.name)?;
        let response = context
            .request(
                "get_preset_details",
                Params::new().set("name", &args.name),
                args.connection.as_ref(),
            )
            .await;
        Ok(render_json(response, args.response_format, |details| {
            format::format_preset_details(&format::as_list(details))
        }))
    }
}

/// Post a macOS notification.
pub struct DisplayNotificationTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NotificationArgs {
    #[serde(deserialize_with = "args::trimmed")]
    title: String,
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    subtitle: Option<String>,
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    sound_name: Option<String>,
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    image_path: Option<String>,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for DisplayNotificationTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_display_notification".to_string(),
            description: "Display a macOS notification through BTT.".to_string(),
            input_schema: args::object_schema(
                json!({
                    "title": {"type": "string", "minLength": 1, "description": "Notification title"},
                    "subtitle": {"type": "string", "description": "Notification subtitle"},
                    "sound_name": {"type": "string", "description": "Sound to play (e.g. 'frog', 'Ping')"},
                    "image_path": {"type": "string", "description": "Image shown in the notification"}
                }),
                &["title"],
            ),
            annotations: Some(ToolAnnotations::mutating("Display Notification").open_world()),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: NotificationArgs = args::parse(arguments)?;
        args::require_non_empty("title", &args.title)?;
        let params = Params::new()
            .set("title", &args.title)
            .set_opt("subTitle", args.subtitle)
            .set_opt("soundName", args.sound_name)
            .set_opt("imagePath", args.image_path);

        let response = context
            .request("display_notification", params, args.connection.as_ref())
            .await;
        Ok(confirm(response, "Notification displayed."))
    }
}

/// Open BTT's configuration UI at an element.
pub struct RevealInUiTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RevealArgs {
    #[serde(deserialize_with = "args::trimmed")]
    uuid: String,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for RevealInUiTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_reveal_in_ui".to_string(),
            description: "Open BetterTouchTool and navigate to a trigger or element for editing."
                .to_string(),
            input_schema: args::object_schema(
                json!({"uuid": args::uuid_schema("UUID of the element to reveal")}),
                &["uuid"],
            ),
            annotations: Some(
                ToolAnnotations::mutating("Reveal Element in BTT UI")
                    .idempotent()
                    .open_world(),
            ),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: RevealArgs = args::parse(arguments)?;
        args::require_uuid("uuid", &args.uuid)?;
        let response = context
            .request(
                "reveal_element_in_ui",
                Params::new().set("uuid", &args.uuid),
                args.connection.as_ref(),
            )
            .await;
        Ok(confirm(
            response,
            format!("Element {} revealed in BTT UI.", args.uuid),
        ))
    }
}
