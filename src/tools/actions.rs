//! Named trigger and predefined action execution.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use super::args;
use super::{reply_or, Tool, ToolContext};
use crate::client::Params;
use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::protocol::{ToolAnnotations, ToolCallResult, ToolDefinition};

pub(super) fn tools() -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(TriggerNamedTool), Arc::new(TriggerActionTool)]
}

fn default_true() -> bool {
    true
}

/// Run a named trigger.
pub struct TriggerNamedTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TriggerNamedArgs {
    #[serde(deserialize_with = "args::trimmed")]
    trigger_name: String,
    #[serde(default = "default_true")]
    wait_for_reply: bool,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for TriggerNamedTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_trigger_named".to_string(),
            description: "Execute a named trigger by name. Named triggers live in BTT's 'Other' \
                tab and can run any sequence of actions."
                .to_string(),
            input_schema: args::object_schema(
                json!({
                    "trigger_name": {
                        "type": "string",
                        "minLength": 1,
                        "description": "Name of the named trigger to execute"
                    },
                    "wait_for_reply": {
                        "type": "boolean",
                        "default": true,
                        "description": "Wait for the trigger to complete and return its result"
                    }
                }),
                &["trigger_name"],
            ),
            annotations: Some(ToolAnnotations::mutating("Trigger Named Trigger").open_world()),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: TriggerNamedArgs = args::parse(arguments)?;
        args::require_non_empty("trigger_name", &args.trigger_name)?;
        let params = Params::new()
            .set("trigger_name", &args.trigger_name)
            .flag("wait_for_reply", args.wait_for_reply);

        let response = context
            .request("trigger_named", params, args.connection.as_ref())
            .await;
        Ok(reply_or(
            response,
            format!("Triggered '{}' successfully.", args.trigger_name),
        ))
    }
}

/// Run a predefined action from its JSON definition.
pub struct TriggerActionTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TriggerActionArgs {
    #[serde(deserialize_with = "args::trimmed")]
    action_json: String,
    #[serde(default)]
    wait_for_reply: bool,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for TriggerActionTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_trigger_action".to_string(),
            description: "Trigger any BTT predefined action from a JSON definition (right-click \
                a configured trigger in BTT and choose 'Copy JSON')."
                .to_string(),
            input_schema: args::object_schema(
                json!({
                    "action_json": {
                        "type": "string",
                        "description": "JSON definition of the action, e.g. {\"BTTPredefinedActionType\": 5}"
                    },
                    "wait_for_reply": {
                        "type": "boolean",
                        "default": false,
                        "description": "Wait for the action to complete"
                    }
                }),
                &["action_json"],
            ),
            annotations: Some(ToolAnnotations::mutating("Trigger BTT Action").open_world()),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: TriggerActionArgs = args::parse(arguments)?;
        args::require_non_empty("action_json", &args.action_json)?;
        let params = Params::new()
            .set("json", &args.action_json)
            .set_opt("wait_for_reply", args.wait_for_reply.then_some("true"));

        let response = context
            .request("trigger_action", params, args.connection.as_ref())
            .await;
        Ok(reply_or(response, "Action triggered successfully."))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing;
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_wait_for_reply_defaults() {
        let named: TriggerNamedArgs = args::parse(json!({"trigger_name": "x"})).unwrap();
        assert!(named.wait_for_reply);
        let action: TriggerActionArgs = args::parse(json!({"action_json": "{}"})).unwrap();
        assert!(!action.wait_for_reply);
    }

    #[tokio::test]
    async fn test_blank_trigger_name_rejected() {
        let err = TriggerNamedTool
            .execute(json!({"trigger_name": "   "}), &testing::context())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParams(_)));
    }

    #[tokio::test]
    async fn test_trigger_action_reports_transport_error() {
        let result = TriggerActionTool
            .execute(
                json!({"action_json": "{\"BTTPredefinedActionType\": 5}"}),
                &testing::context(),
            )
            .await
            .unwrap();
        assert!(result.is_error);
    }
}
