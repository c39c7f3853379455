//! Documentation lookup tool.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use super::args;
use super::{Tool, ToolContext};
use crate::error::Result;
use crate::protocol::{ToolAnnotations, ToolCallResult, ToolDefinition};

pub(super) fn tools() -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(LookupReferenceTool)]
}

/// Search the bundled BTT reference docs.
pub struct LookupReferenceTool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LookupArgs {
    #[serde(default, deserialize_with = "args::trimmed_opt")]
    topic: Option<String>,
}

#[async_trait::async_trait]
impl Tool for LookupReferenceTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "btt_lookup_reference".to_string(),
            description: "Look up BetterTouchTool reference documentation: trigger JSON format, \
                trigger type IDs, CLI commands, predefined actions and variables. Call without a \
                topic to list what is available."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "topic": {
                        "type": "string",
                        "description": "What to look up, e.g. 'keyboard shortcut', 'named trigger', 'modifier keys', 'variables'"
                    }
                },
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::read_only("Lookup BTT Reference")),
        }
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> Result<ToolCallResult> {
        let args: LookupArgs = args::parse(arguments)?;
        Ok(ToolCallResult::text(
            context.reference.lookup(args.topic.as_deref()),
        ))
    }
}
