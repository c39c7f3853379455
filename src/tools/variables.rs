//! Variable get/set tools.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use super::args;
use super::{Tool, ToolContext};
use crate::client::{self, Params};
use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::protocol::{ToolAnnotations, ToolCallResult, ToolDefinition};

pub(super) fn tools() -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(GetVariableTool), Arc::new(SetVariableTool)]
}

/// Kind of BTT variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    /// String variable.
    #[default]
    String,
    /// Number variable.
    Number,
}

impl VariableType {
    fn get_endpoint(self) -> &'static str {
        match self {
            VariableType::String => "get_string_variable",
            VariableType::Number => "get_number_variable",
        }
    }

    fn set_endpoint(self, persistent: bool) -> &'static str {
        match (self, persistent) {
            (VariableType::String, false) => "set_string_variable",
            (VariableType::String, true) => "set_persistent_string_variable",
            (VariableType::Number, false) => "set_number_variable",
            (VariableType::Number, true) => "set_persistent_number_variable",
        }
    }
}

fn variable_type_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["string", "number"],
        "default": "string",
        "description": "Type of variable"
    })
}

/// Read a variable.
pub struct GetVariableTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetVariableArgs {
    #[serde(deserialize_with = "args::trimmed")]
    variable_name: String,
    #[serde(default)]
    variable_type: VariableType,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for GetVariableTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_get_variable".to_string(),
            description: "Get the value of a built-in (e.g. BTTActiveAppBundleIdentifier) or \
                user-defined BTT variable."
                .to_string(),
            input_schema: args::object_schema(
                json!({
                    "variable_name": {
                        "type": "string",
                        "minLength": 1,
                        "description": "Name of the variable to retrieve"
                    },
                    "variable_type": variable_type_schema()
                }),
                &["variable_name"],
            ),
            annotations: Some(ToolAnnotations::read_only("Get BTT Variable")),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: GetVariableArgs = args::parse(arguments)?;
        args::require_non_empty("variable_name", &args.variable_name)?;

        let response = context
            .request(
                args.variable_type.get_endpoint(),
                Params::new().set("variableName", &args.variable_name),
                args.connection.as_ref(),
            )
            .await;

        if client::is_error(&response) {
            return Ok(ToolCallResult::text(response));
        }
        Ok(ToolCallResult::text(format!(
            "**{}** = `{}`",
            args.variable_name, response
        )))
    }
}

/// Write a variable.
pub struct SetVariableTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SetVariableArgs {
    #[serde(deserialize_with = "args::trimmed")]
    variable_name: String,
    #[serde(deserialize_with = "args::trimmed")]
    value: String,
    #[serde(default)]
    variable_type: VariableType,
    #[serde(default)]
    persistent: bool,
    #[serde(default)]
    connection: Option<ConnectionConfig>,
}

#[async_trait::async_trait]
impl Tool for SetVariableTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_set_variable".to_string(),
            description: "Set a BTT variable. Persistent variables survive a BTT restart."
                .to_string(),
            input_schema: args::object_schema(
                json!({
                    "variable_name": {
                        "type": "string",
                        "minLength": 1,
                        "description": "Name of the variable to set"
                    },
                    "value": {
                        "type": "string",
                        "description": "Value to set (converted to a number for number variables)"
                    },
                    "variable_type": variable_type_schema(),
                    "persistent": {
                        "type": "boolean",
                        "default": false,
                        "description": "Keep the variable across BTT restarts"
                    }
                }),
                &["variable_name", "value"],
            ),
            annotations: Some(ToolAnnotations::mutating("Set BTT Variable").idempotent()),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: SetVariableArgs = args::parse(arguments)?;
        args::require_non_empty("variable_name", &args.variable_name)?;
        let params = Params::new()
            .set("variableName", &args.variable_name)
            .set("to", &args.value);

        let response = context
            .request(
                args.variable_type.set_endpoint(args.persistent),
                params,
                args.connection.as_ref(),
            )
            .await;

        if client::is_error(&response) {
            return Ok(ToolCallResult::text(response));
        }
        let persistence = if args.persistent { "persistent " } else { "" };
        Ok(ToolCallResult::text(format!(
            "Set {persistence}variable **{}** to `{}`",
            args.variable_name, args.value
        )))
    }
}
