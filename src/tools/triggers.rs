//! Trigger management tools.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use super::args::{self, ResponseFormat};
use super::{render_json, render_triggers, reply_or, Tool, ToolContext};
use crate::client::Params;
use crate::config::{trigger_class, ConnectionConfig, NAMED_TRIGGER_ID};
use crate::error::Result;
use crate::format;
use crate::protocol::{ToolAnnotations, ToolCallResult, ToolDefinition};

pub(super) fn tools() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(GetTriggersTool),
        Arc::new(GetTriggerTool),
        Arc::new(ListNamedTriggersTool),
        Arc::new(AddTriggerTool),
        Arc::new(UpdateTriggerTool),
        Arc::new(DeleteTriggerTool),
        Arc::new(ExecuteTriggerTool),
    ]
}

/// Arguments naming a single trigger.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UuidArgs {
    #[serde(deserialize_with = "args::trimmed")]
    uuid: String,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

impl UuidArgs {
    fn parse(arguments: Value) -> Result<Self> {
        let parsed: Self = args::parse(arguments)?;
        args::require_uuid("uuid", &parsed.uuid)?;
        Ok(parsed)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetTriggerArgs {
    #[serde(deserialize_with = "args::trimmed")]
    uuid: String,
    #[serde(default)]
    response_format: ResponseFormat,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

/// List triggers with optional filters.
pub struct GetTriggersTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetTriggersArgs {
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    trigger_type: Option<String>,
    #[serde(default)]
    trigger_id: Option<i64>,
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    trigger_parent_uuid: Option<String>,
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    trigger_uuid: Option<String>,
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    app_bundle_identifier: Option<String>,
    #[serde(default)]
    response_format: ResponseFormat,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for GetTriggersTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_get_triggers".to_string(),
            description: "Retrieve triggers from BetterTouchTool with optional filtering by \
                trigger type, trigger ID, parent folder, UUID or app. Shorthand trigger types \
                (keyboard_shortcut, trackpad, touch_bar, named, floating_menu, ...) are accepted."
                .to_string(),
            input_schema: args::object_schema(
                json!({
                    "trigger_type": {
                        "type": "string",
                        "description": "Filter by trigger type (e.g. 'BTTTriggerTypeKeyboardShortcut' or 'keyboard_shortcut')"
                    },
                    "trigger_id": {
                        "type": "integer",
                        "description": "Filter by trigger ID (e.g. 643 for named triggers)"
                    },
                    "trigger_parent_uuid": {
                        "type": "string",
                        "description": "Get triggers within a specific parent group/folder"
                    },
                    "trigger_uuid": {
                        "type": "string",
                        "description": "Get a specific trigger by UUID"
                    },
                    "app_bundle_identifier": {
                        "type": "string",
                        "description": "Get triggers for a specific app (e.g. 'com.apple.Safari')"
                    },
                    "response_format": args::response_format_schema()
                }),
                &[],
            ),
            annotations: Some(ToolAnnotations::read_only("Get BTT Triggers")),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: GetTriggersArgs = args::parse(arguments)?;
        let params = Params::new()
            .set_opt("trigger_type", args.trigger_type.as_deref().map(trigger_class))
            .set_opt("trigger_id", args.trigger_id)
            .set_opt("trigger_parent_uuid", args.trigger_parent_uuid)
            .set_opt("trigger_uuid", args.trigger_uuid)
            .set_opt("trigger_app_bundle_identifier", args.app_bundle_identifier);

        let response = context
            .request("get_triggers", params, args.connection.as_ref())
            .await;
        Ok(render_triggers(response, args.response_format, "Triggers"))
    }
}

/// Fetch one trigger by UUID.
pub struct GetTriggerTool;

#[async_trait::async_trait]
impl Tool for GetTriggerTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_get_trigger".to_string(),
            description: "Retrieve a single trigger by UUID, including its configuration and \
                assigned actions."
                .to_string(),
            input_schema: args::object_schema(
                json!({
                    "uuid": args::uuid_schema("UUID of the trigger to retrieve"),
                    "response_format": args::response_format_schema()
                }),
                &["uuid"],
            ),
            annotations: Some(ToolAnnotations::read_only("Get Single BTT Trigger")),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: GetTriggerArgs = args::parse(arguments)?;
        args::require_uuid("uuid", &args.uuid)?;
        let response = context
            .request(
                "get_trigger",
                Params::new().set("uuid", &args.uuid),
                args.connection.as_ref(),
            )
            .await;
        Ok(render_json(response, args.response_format, |trigger| {
            format::format_trigger(&trigger, 0)
        }))
    }
}

/// List named triggers.
pub struct ListNamedTriggersTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListArgs {
    #[serde(default)]
    response_format: ResponseFormat,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for ListNamedTriggersTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_list_named_triggers".to_string(),
            description: "List the named triggers (configured under 'Other') that scripts and \
                actions can call by name."
                .to_string(),
            input_schema: args::object_schema(
                json!({"response_format": args::response_format_schema()}),
                &[],
            ),
            annotations: Some(ToolAnnotations::read_only("List Named Triggers")),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: ListArgs = args::parse(arguments)?;
        let response = context
            .request(
                "get_triggers",
                Params::new().set("trigger_id", NAMED_TRIGGER_ID),
                args.connection.as_ref(),
            )
            .await;
        Ok(render_triggers(response, args.response_format, "Named Triggers"))
    }
}

/// Add a trigger from JSON.
pub struct AddTriggerTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AddTriggerArgs {
    #[serde(deserialize_with = "args::trimmed")]
    trigger_json: String,
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    parent_uuid: Option<String>,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for AddTriggerTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_add_trigger".to_string(),
            description: "Add a new trigger from its JSON definition. Use btt_lookup_reference \
                for trigger type IDs and the JSON format."
                .to_string(),
            input_schema: args::object_schema(
                json!({
                    "trigger_json": {
                        "type": "string",
                        "description": "JSON definition of the trigger. Must include BTTTriggerType (int) and \
                            BTTTriggerClass (string). For named triggers: BTTTriggerType=643, \
                            BTTTriggerClass=\"BTTTriggerTypeOtherTriggers\" and BTTTriggerName. \
                            Actions go in the BTTActionsToExecute array."
                    },
                    "parent_uuid": {
                        "type": "string",
                        "description": "UUID of the parent group/folder to add the trigger to"
                    }
                }),
                &["trigger_json"],
            ),
            annotations: Some(ToolAnnotations::mutating("Add New Trigger")),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: AddTriggerArgs = args::parse(arguments)?;
        args::require_non_empty("trigger_json", &args.trigger_json)?;
        let params = Params::new()
            .set("json", &args.trigger_json)
            .set_opt("trigger_parent_uuid", args.parent_uuid);

        let response = context
            .request("add_new_trigger", params, args.connection.as_ref())
            .await;
        Ok(reply_or(response, "Trigger added successfully."))
    }
}

/// Update a trigger's properties.
pub struct UpdateTriggerTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateTriggerArgs {
    #[serde(deserialize_with = "args::trimmed")]
    uuid: String,
    #[serde(deserialize_with = "args::trimmed")]
    update_json: String,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for UpdateTriggerTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_update_trigger".to_string(),
            description: "Update an existing trigger. Only the properties present in the JSON \
                are changed."
                .to_string(),
            input_schema: args::object_schema(
                json!({
                    "uuid": args::uuid_schema("UUID of the trigger to update"),
                    "update_json": {
                        "type": "string",
                        "description": "JSON with the properties to change, e.g. {\"BTTTriggerName\": \"new_name\"}"
                    }
                }),
                &["uuid", "update_json"],
            ),
            annotations: Some(ToolAnnotations::mutating("Update Trigger").idempotent()),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: UpdateTriggerArgs = args::parse(arguments)?;
        args::require_uuid("uuid", &args.uuid)?;
        let params = Params::new()
            .set("uuid", &args.uuid)
            .set("json", &args.update_json);

        let response = context
            .request("update_trigger", params, args.connection.as_ref())
            .await;
        Ok(reply_or(
            response,
            format!("Trigger {} updated successfully.", args.uuid),
        ))
    }
}

/// Delete a trigger.
pub struct DeleteTriggerTool;

#[async_trait::async_trait]
impl Tool for DeleteTriggerTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_delete_trigger".to_string(),
            description: "Permanently delete a trigger. Double-check the UUID first.".to_string(),
            input_schema: args::object_schema(
                json!({"uuid": args::uuid_schema("UUID of the trigger to delete")}),
                &["uuid"],
            ),
            annotations: Some(ToolAnnotations::mutating("Delete Trigger").destructive()),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args = UuidArgs::parse(arguments)?;
        let response = context
            .request(
                "delete_trigger",
                Params::new().set("uuid", &args.uuid),
                args.connection.as_ref(),
            )
            .await;
        Ok(reply_or(
            response,
            format!("Trigger {} deleted successfully.", args.uuid),
        ))
    }
}

/// Run a trigger's assigned actions.
pub struct ExecuteTriggerTool;

#[async_trait::async_trait]
impl Tool for ExecuteTriggerTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_execute_trigger".to_string(),
            description: "Execute all actions assigned to a trigger.".to_string(),
            input_schema: args::object_schema(
                json!({"uuid": args::uuid_schema("UUID of the trigger whose actions should run")}),
                &["uuid"],
            ),
            annotations: Some(ToolAnnotations::mutating("Execute Trigger Actions").open_world()),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args = UuidArgs::parse(arguments)?;
        let response = context
            .request(
                "execute_assigned_actions_for_trigger",
                Params::new().set("uuid", &args.uuid),
                args.connection.as_ref(),
            )
            .await;
        Ok(reply_or(
            response,
            format!("Executed actions for trigger {} successfully.", args.uuid),
        ))
    }
}
