//! Canonical trace model.
//!
//! The vendor-neutral representation every downstream consumer (storage,
//! search, analytics) sees. All types are plain data produced fresh per
//! conversion; nothing here holds process-wide state.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

// ============================================================================
// SPAN TYPE
// ============================================================================

/// Canonical span classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpanType {
    #[default]
    Span,
    Llm,
    Chain,
    Tool,
    Agent,
    Task,
    Component,
    Module,
    Guardrail,
    Evaluation,
    Rag,
    Workflow,
    Server,
    Client,
    Producer,
    Consumer,
    Unknown,
}

impl SpanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Span => "span",
            Self::Llm => "llm",
            Self::Chain => "chain",
            Self::Tool => "tool",
            Self::Agent => "agent",
            Self::Task => "task",
            Self::Component => "component",
            Self::Module => "module",
            Self::Guardrail => "guardrail",
            Self::Evaluation => "evaluation",
            Self::Rag => "rag",
            Self::Workflow => "workflow",
            Self::Server => "server",
            Self::Client => "client",
            Self::Producer => "producer",
            Self::Consumer => "consumer",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a lower-cased type name, returning None outside the allowed set.
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "span" => Self::Span,
            "llm" => Self::Llm,
            "chain" => Self::Chain,
            "tool" => Self::Tool,
            "agent" => Self::Agent,
            "task" => Self::Task,
            "component" => Self::Component,
            "module" => Self::Module,
            "guardrail" => Self::Guardrail,
            "evaluation" => Self::Evaluation,
            "rag" => Self::Rag,
            "workflow" => Self::Workflow,
            "server" => Self::Server,
            "client" => Self::Client,
            "producer" => Self::Producer,
            "consumer" => Self::Consumer,
            "unknown" => Self::Unknown,
            _ => return None,
        })
    }
}

impl std::fmt::Display for SpanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CHAT MESSAGES
// ============================================================================

/// Chat roles accepted by the chat-message schema. An unrecognized role
/// fails validation, which makes the candidate fall through to the next
/// input/output extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Function,
    Tool,
    Unknown,
}

/// One chat message. Every field is optional on the wire; schema validation
/// only rejects shapes that are not objects or carry a role outside the
/// closed set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<ChatRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<JsonValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ============================================================================
// TYPED VALUES
// ============================================================================

/// Polymorphic input/output payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TypedValue {
    Text(String),
    Json(JsonValue),
    ChatMessages(Vec<ChatMessage>),
}

// ============================================================================
// ERRORS AND TIMING
// ============================================================================

/// Normalized failure info, at most one per span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub has_error: bool,
    pub message: String,
    pub stacktrace: Vec<String>,
}

/// Span timing in epoch milliseconds. Absent means unknown, not "at epoch".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanTimestamps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_token_at: Option<i64>,
}

// ============================================================================
// CANONICAL SPANS AND TRACES
// ============================================================================

/// One normalized span. Belongs to exactly one trace matching `trace_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalSpan {
    pub span_id: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub span_type: SpanType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<TypedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<TypedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorRecord>,
    #[serde(default, skip_serializing_if = "JsonMap::is_empty")]
    pub params: JsonMap<String, JsonValue>,
    pub timestamps: SpanTimestamps,
}

/// One normalized trace: the spans of a single trace id plus trace-level
/// metadata accrued from resource attributes and span conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalTrace {
    pub trace_id: String,
    pub spans: Vec<CanonicalSpan>,
    #[serde(default, skip_serializing_if = "JsonMap::is_empty")]
    pub reserved_metadata: JsonMap<String, JsonValue>,
    #[serde(default, skip_serializing_if = "JsonMap::is_empty")]
    pub custom_metadata: JsonMap<String, JsonValue>,
}
