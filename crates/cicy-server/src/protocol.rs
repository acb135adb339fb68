//! Wire types for the JSON-RPC (MCP) and REST surfaces.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// JSON-RPC version tag carried by every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision advertised by `initialize` and `/health`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "cicy-server";

/// Standard JSON-RPC error codes.
pub mod codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// Incoming JSON-RPC request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Correlation value echoed back verbatim.
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn parse_error() -> Self {
        Self::new(codes::PARSE_ERROR, "Parse error")
    }

    pub fn method_not_found(message: impl Into<String>) -> Self {
        Self::new(codes::METHOD_NOT_FOUND, message)
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(codes::INVALID_PARAMS, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL_ERROR, message)
    }
}

/// Either half of a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(RpcError),
}

/// Outgoing JSON-RPC response: `result` xor `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl JsonRpcResponse {
    #[must_use]
    pub fn new(id: Value, outcome: Result<Value, RpcError>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: match outcome {
                Ok(result) => Outcome::Result(result),
                Err(error) => Outcome::Error(error),
            },
        }
    }

    /// The error half, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&RpcError> {
        match &self.outcome {
            Outcome::Error(e) => Some(e),
            Outcome::Result(_) => None,
        }
    }
}

/// Static description of a callable tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Tool names.
pub mod tools {
    pub const SEND_MESSAGE: &str = "send_message";
    pub const GET_MESSAGES: &str = "get_messages";
    pub const CLEAR_MESSAGES: &str = "clear_messages";
}

/// The fixed tool catalog returned by `tools/list`.
#[must_use]
pub fn tool_catalog() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: tools::SEND_MESSAGE.into(),
            description: "Send a text message to the server".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "message": {
                        "type": "string",
                        "description": "The message to send"
                    }
                },
                "required": ["message"]
            }),
        },
        ToolDefinition {
            name: tools::GET_MESSAGES.into(),
            description: "Get all messages from the server".into(),
            input_schema: json!({ "type": "object", "properties": {} }),
        },
        ToolDefinition {
            name: tools::CLEAR_MESSAGES.into(),
            description: "Clear all messages".into(),
            input_schema: json!({ "type": "object", "properties": {} }),
        },
    ]
}

/// `tools/call` parameters. Missing fields fall back to empty values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolCallParams {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// One block of tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// Result of `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    pub is_error: bool,
}

impl ToolCallResult {
    /// A successful result holding one text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }
}

/// Body of `POST /message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub message: Option<String>,
}

impl SubmitRequest {
    /// Read a request from any JSON value. A `message` that is missing or
    /// not a string counts as absent.
    #[must_use]
    pub fn from_json(body: &Value) -> Self {
        Self {
            message: body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned),
        }
    }
}

/// Body returned by `POST /message` and `POST /api/message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub protocol: String,
    pub version: String,
    pub messages: usize,
    pub images: usize,
}

/// A single text or image item pushed to `POST /api/message`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Base64 encoded image bytes.
    #[serde(default)]
    pub data: Option<String>,
}

/// Where an image item's bytes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource<'a> {
    Url(&'a str),
    Inline(&'a str),
}

impl ContentItem {
    /// Non-empty text, if present.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// Image source; a URL wins over inline data.
    #[must_use]
    pub fn image_source(&self) -> Option<ImageSource<'_>> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            return Some(ImageSource::Url(url));
        }
        self.data
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(ImageSource::Inline)
    }
}

/// Body of `POST /api/message`: a content array, or one legacy item.
///
/// Content entries are kept as raw JSON so one malformed entry does not
/// reject the whole batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestBody {
    #[serde(flatten)]
    pub item: ContentItem,
    #[serde(default)]
    pub content: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_carries_result_xor_error() {
        let ok = JsonRpcResponse::new(json!(7), Ok(json!({"x": 1})));
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], 7);
        assert_eq!(json["result"]["x"], 1);
        assert!(json.get("error").is_none());

        let err = JsonRpcResponse::new(json!("abc"), Err(RpcError::parse_error()));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["error"]["code"], -32700);
        assert!(json.get("result").is_none());
        assert!(json["error"].get("data").is_none());
    }

    #[test]
    fn test_catalog_has_three_unique_tools() {
        let catalog = tool_catalog();
        let names: Vec<_> = catalog.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["send_message", "get_messages", "clear_messages"]);

        let json = serde_json::to_value(&catalog[0]).unwrap();
        assert_eq!(json["inputSchema"]["required"][0], "message");
    }

    #[test]
    fn test_tool_result_shape() {
        let json = serde_json::to_value(ToolCallResult::text("done")).unwrap();
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][0]["text"], "done");
        assert_eq!(json["isError"], false);
    }

    #[test]
    fn test_ingest_body_accepts_both_shapes() {
        let legacy: IngestBody =
            serde_json::from_str(r#"{"type":"text","text":"hello"}"#).unwrap();
        assert!(legacy.content.is_empty());
        assert_eq!(legacy.item.kind.as_deref(), Some("text"));
        assert_eq!(legacy.item.text(), Some("hello"));

        let batch: IngestBody = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"a"},{"type":"image","url":"http://x/y.png"}]}"#,
        )
        .unwrap();
        assert_eq!(batch.content.len(), 2);
    }

    #[test]
    fn test_image_source_prefers_url() {
        let item = ContentItem {
            kind: Some("image".into()),
            url: Some("http://host/a.png".into()),
            data: Some("AAAA".into()),
            ..ContentItem::default()
        };
        assert_eq!(item.image_source(), Some(ImageSource::Url("http://host/a.png")));

        let inline = ContentItem {
            url: Some(String::new()),
            data: Some("AAAA".into()),
            ..ContentItem::default()
        };
        assert_eq!(inline.image_source(), Some(ImageSource::Inline("AAAA")));
        assert_eq!(ContentItem::default().image_source(), None);
    }
}
