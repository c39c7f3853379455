//! Argument parsing and schema helpers shared by the tools.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use crate::error::{Error, Result};

/// Length of a BTT UUID (`XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX`).
pub const UUID_LEN: usize = 36;

/// Output format for tools that read structured data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Human-readable markdown.
    #[default]
    Markdown,
    /// Raw JSON as returned by BTT.
    Json,
}

/// Deserialize tool arguments. A missing/`null` argument object counts as `{}`.
pub fn parse<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = match arguments {
        Value::Null => json!({}),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| Error::InvalidParams(e.to_string()))
}

/// Require a 36-character UUID.
pub fn require_uuid(field: &str, value: &str) -> Result<()> {
    if value.chars().count() != UUID_LEN {
        return Err(Error::InvalidParams(format!(
            "{field} must be exactly {UUID_LEN} characters, got {}",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Require a non-empty string.
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidParams(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Trim a required string.
pub fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

/// Trim an optional string; blank becomes `None`.
pub fn trimmed_opt<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Schema of the optional `connection` override.
pub fn connection_schema() -> Value {
    json!({
        "type": "object",
        "description": "BTT connection override (defaults to the server configuration)",
        "properties": {
            "host": {"type": "string", "description": "BTT webserver host (default: 127.0.0.1)"},
            "port": {"type": "integer", "minimum": 1, "maximum": 65535, "description": "BTT webserver port (default: 12345)"},
            "shared_secret": {"type": "string", "description": "Shared secret for BTT webserver authentication"},
            "use_cli": {"type": "boolean", "description": "Use bttcli instead of HTTP"}
        },
        "additionalProperties": false
    })
}

/// Schema of a UUID field.
pub fn uuid_schema(description: &str) -> Value {
    json!({
        "type": "string",
        "minLength": UUID_LEN,
        "maxLength": UUID_LEN,
        "description": description
    })
}

/// Schema of the `response_format` field.
pub fn response_format_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["markdown", "json"],
        "default": "markdown",
        "description": "Output format: 'markdown' for human-readable or 'json' for raw data"
    })
}

/// Build an object schema; every tool also accepts `connection`.
pub fn object_schema(properties: Value, required: &[&str]) -> Value {
    let mut properties = match properties {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    properties.insert("connection".into(), connection_schema());
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}
