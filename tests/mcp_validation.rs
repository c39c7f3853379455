//! MCP server validation tests.
//!
//! Drives the `btt-mcp` binary over stdio: JSON-RPC 2.0 protocol compliance,
//! tool execution against a mock BTT webserver, and error handling.

mod common;

use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;

use common::{closed_port, MockBtt};

// JSON-RPC 2.0 types
#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

impl JsonRpcRequest {
    fn new(id: u64, method: &str, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id: Some(id),
            method: method.into(),
            params,
        }
    }

    fn notification(method: &str) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id: None,
            method: method.into(),
            params: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    id: Option<u64>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    #[allow(dead_code)]
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// MCP test client wrapping a spawned server process.
struct McpTestClient {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

impl McpTestClient {
    async fn spawn(port: u16) -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_btt-mcp"))
            .args(["--port", &port.to_string()])
            .arg("--docs-dir")
            .arg(concat!(env!("CARGO_MANIFEST_DIR"), "/docs/btt"))
            .env_remove("BTT_USE_CLI")
            .env_remove("BTT_HOST")
            .env_remove("BTT_SHARED_SECRET")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .expect("failed to start btt-mcp");

        let stdin = child.stdin.take().expect("stdin");
        let stdout = BufReader::new(child.stdout.take().expect("stdout")).lines();
        Self {
            child,
            stdin,
            stdout,
        }
    }

    /// Spawn and complete the `initialize` handshake.
    async fn ready(port: u16) -> Self {
        let mut client = Self::spawn(port).await;
        let response = client.send_request(initialize(1)).await;
        assert!(response.error.is_none());
        client
            .send(&JsonRpcRequest::notification("notifications/initialized"))
            .await;
        client
    }

    async fn send_line(&mut self, line: &str) {
        self.stdin.write_all(line.as_bytes()).await.unwrap();
        self.stdin.write_all(b"\n").await.unwrap();
        self.stdin.flush().await.unwrap();
    }

    async fn send(&mut self, request: &JsonRpcRequest) {
        let json = serde_json::to_string(request).unwrap();
        self.send_line(&json).await;
    }

    async fn read_response(&mut self) -> JsonRpcResponse {
        let line = timeout(Duration::from_secs(10), self.stdout.next_line())
            .await
            .expect("timed out waiting for response")
            .unwrap()
            .expect("server closed connection");
        serde_json::from_str(&line).unwrap()
    }

    async fn send_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        self.send(&request).await;
        self.read_response().await
    }

    async fn call_tool(&mut self, id: u64, name: &str, arguments: Value) -> JsonRpcResponse {
        self.send_request(JsonRpcRequest::new(
            id,
            "tools/call",
            Some(json!({ "name": name, "arguments": arguments })),
        ))
        .await
    }
}

fn initialize(id: u64) -> JsonRpcRequest {
    JsonRpcRequest::new(
        id,
        "initialize",
        Some(json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {"name": "test-client", "version": "0.1.0"}
        })),
    )
}

fn tool_text(response: &JsonRpcResponse) -> (&str, bool) {
    let result = response.result.as_ref().expect("tool result");
    let text = result["content"][0]["text"].as_str().expect("text content");
    let is_error = result["isError"].as_bool().unwrap_or(false);
    (text, is_error)
}

// ============================================================================
// Protocol Compliance Tests
// ============================================================================

#[tokio::test]
async fn test_initialize_handshake() {
    let mut client = McpTestClient::spawn(closed_port().await).await;

    let response = client.send_request(initialize(1)).await;
    assert_eq!(response.jsonrpc, "2.0");
    assert_eq!(response.id, Some(1));
    assert!(response.error.is_none(), "Should not have error");

    let result = response.result.unwrap();
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "btt-mcp");
    assert!(result["capabilities"]["tools"].is_object());
    assert!(result["instructions"]
        .as_str()
        .unwrap()
        .contains("btt_lookup_reference"));
}

#[tokio::test]
async fn test_list_tools() {
    let mut client = McpTestClient::ready(closed_port().await).await;

    let response = client
        .send_request(JsonRpcRequest::new(2, "tools/list", None))
        .await;
    assert!(response.error.is_none(), "Should not have error");

    let result = response.result.unwrap();
    let tools = result["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 29);

    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted, "tools should be listed by name");

    for expected in [
        "btt_get_triggers",
        "btt_trigger_named",
        "btt_create_floating_menu",
        "btt_toggle_floating_menu",
        "btt_lookup_reference",
    ] {
        assert!(names.contains(&expected), "missing {expected}");
    }

    for tool in tools {
        assert_eq!(tool["inputSchema"]["type"], "object");
        assert!(tool["description"].as_str().is_some_and(|d| !d.is_empty()));
    }
}

#[tokio::test]
async fn test_notification_gets_no_response() {
    let mut client = McpTestClient::ready(closed_port().await).await;

    client
        .send(&JsonRpcRequest::notification("notifications/cancelled"))
        .await;
    let response = client
        .send_request(JsonRpcRequest::new(7, "ping", None))
        .await;
    assert_eq!(response.id, Some(7));
    assert_eq!(response.result, Some(json!({})));
}

#[tokio::test]
async fn test_shutdown_exits_process() {
    let mut client = McpTestClient::ready(closed_port().await).await;

    let response = client
        .send_request(JsonRpcRequest::new(9, "shutdown", None))
        .await;
    assert!(response.error.is_none());

    let status = timeout(Duration::from_secs(5), client.child.wait())
        .await
        .expect("server did not exit")
        .unwrap();
    assert!(status.success());
}

// ============================================================================
// Tool Execution Tests
// ============================================================================

#[tokio::test]
async fn test_lookup_reference_catalog_and_topic() {
    let mut client = McpTestClient::ready(closed_port().await).await;

    let response = client.call_tool(3, "btt_lookup_reference", json!({})).await;
    let (text, is_error) = tool_text(&response);
    assert!(!is_error);
    assert!(text.starts_with("## Available BTT Reference Topics"));

    let response = client
        .call_tool(4, "btt_lookup_reference", json!({ "topic": "named trigger" }))
        .await;
    let (text, _) = tool_text(&response);
    assert!(text.starts_with("**Source: "));
    assert!(text.contains("643"));
}

#[tokio::test]
async fn test_get_variable_against_webserver() {
    let btt = MockBtt::start(200, "Finder").await;
    let mut client = McpTestClient::ready(btt.port).await;

    let response = client
        .call_tool(
            5,
            "btt_get_variable",
            json!({ "variable_name": " BTTActiveAppName " }),
        )
        .await;
    let (text, is_error) = tool_text(&response);
    assert!(!is_error);
    assert_eq!(text, "**BTTActiveAppName** = `Finder`");
    assert_eq!(
        btt.requests(),
        vec!["GET /get_string_variable/?variableName=BTTActiveAppName HTTP/1.1"]
    );
}

#[tokio::test]
async fn test_per_call_connection_override() {
    let btt = MockBtt::start(200, "").await;
    let mut client = McpTestClient::ready(closed_port().await).await;

    let response = client
        .call_tool(
            6,
            "btt_refresh_widget",
            json!({
                "uuid": "12345678-1234-1234-1234-123456789012",
                "connection": { "port": btt.port, "shared_secret": "abc" }
            }),
        )
        .await;
    let (text, is_error) = tool_text(&response);
    assert!(!is_error, "{text}");
    assert_eq!(btt.requests().len(), 1);
    assert!(btt.requests()[0].contains("shared_secret=abc"));
}

#[tokio::test]
async fn test_unreachable_btt_is_tool_error() {
    let port = closed_port().await;
    let mut client = McpTestClient::ready(port).await;

    let response = client
        .call_tool(
            8,
            "btt_get_trigger",
            json!({ "uuid": "12345678-1234-1234-1234-123456789012" }),
        )
        .await;
    assert!(response.error.is_none(), "transport failures are tool output");
    let (text, is_error) = tool_text(&response);
    assert!(is_error);
    assert!(text.starts_with("Error: Could not connect to BTT webserver"));
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[tokio::test]
async fn test_unknown_method() {
    let mut client = McpTestClient::ready(closed_port().await).await;

    let response = client
        .send_request(JsonRpcRequest::new(10, "resources/list", None))
        .await;
    assert_eq!(response.id, Some(10));
    assert_eq!(response.error.unwrap().code, -32601);
}

#[tokio::test]
async fn test_unknown_tool() {
    let mut client = McpTestClient::ready(closed_port().await).await;

    let response = client.call_tool(11, "btt_does_not_exist", json!({})).await;
    let error = response.error.unwrap();
    assert_eq!(error.code, -32601);
    assert_eq!(error.data.unwrap()["tool"], "btt_does_not_exist");
}

#[tokio::test]
async fn test_invalid_tool_arguments() {
    let mut client = McpTestClient::ready(closed_port().await).await;

    let short_uuid = client
        .call_tool(12, "btt_get_trigger", json!({ "uuid": "too-short" }))
        .await;
    assert_eq!(short_uuid.error.unwrap().code, -32602);

    let unknown_field = client
        .call_tool(13, "btt_list_named_triggers", json!({ "bogus": true }))
        .await;
    assert_eq!(unknown_field.error.unwrap().code, -32602);
}

#[tokio::test]
async fn test_malformed_json() {
    let mut client = McpTestClient::ready(closed_port().await).await;

    client.send_line("{this is not json").await;
    let response = client.read_response().await;
    assert_eq!(response.id, None);
    assert_eq!(response.error.unwrap().code, -32700);

    // The server keeps serving after a bad line.
    let response = client
        .send_request(JsonRpcRequest::new(14, "ping", None))
        .await;
    assert_eq!(response.id, Some(14));
}
