//! Wire model of a trace export request.
//!
//! This is the JSON rendition of the trace export payload as emitted by
//! heterogeneous producers. Identifiers arrive base64-encoded, enum fields
//! arrive as protobuf numbers or symbolic names, and 64-bit integers arrive
//! as plain numbers, decimal strings, or split `{high, low, unsigned}`
//! word pairs.

use serde::{Deserialize, Serialize};

/// One inbound batch of tracing data, potentially spanning multiple traces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportRequest {
    pub resource_spans: Vec<ResourceSpans>,
}

impl ExportRequest {
    /// Iterate over every span in every scope in every resource group.
    pub fn spans(&self) -> impl Iterator<Item = &WireSpan> {
        self.resource_spans
            .iter()
            .flat_map(|rs| &rs.scope_spans)
            .flat_map(|ss| &ss.spans)
    }
}

/// Spans grouped by the process that produced them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceSpans {
    pub resource: Option<Resource>,
    pub scope_spans: Vec<ScopeSpans>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Resource {
    pub attributes: Vec<KeyValue>,
}

/// Spans grouped by the instrumentation library that produced them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScopeSpans {
    pub scope: Option<Scope>,
    pub spans: Vec<WireSpan>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scope {
    pub name: Option<String>,
    pub version: Option<String>,
    pub attributes: Vec<KeyValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireSpan {
    pub trace_id: String,
    pub span_id: String,
    pub parent_span_id: Option<String>,
    pub name: String,
    pub kind: Option<WireEnum>,
    pub start_time_unix_nano: Option<WireLong>,
    pub end_time_unix_nano: Option<WireLong>,
    pub attributes: Vec<KeyValue>,
    pub events: Vec<WireEvent>,
    pub status: Option<WireStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireEvent {
    pub name: String,
    pub time_unix_nano: Option<WireLong>,
    pub attributes: Vec<KeyValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireStatus {
    pub code: Option<WireEnum>,
    pub message: Option<String>,
}

/// One dotted-key attribute with its typed value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyValue {
    pub key: String,
    pub value: Option<AnyValue>,
}

/// The wire value union: exactly one case per wire kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnyValue {
    StringValue(String),
    BoolValue(bool),
    IntValue(WireLong),
    DoubleValue(f64),
    BytesValue(WireBytes),
    ArrayValue(ArrayValue),
    KvlistValue(KeyValueList),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayValue {
    pub values: Vec<AnyValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyValueList {
    pub values: Vec<KeyValue>,
}

/// Byte payloads arrive base64-encoded (proto JSON) or as raw byte arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireBytes {
    Encoded(String),
    Raw(Vec<u8>),
}

/// Enum fields arrive as protobuf numbers or symbolic names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireEnum {
    Number(i64),
    Name(String),
}

/// A 64-bit integer in any of the encodings producers emit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireLong {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Decimal(String),
    Words(LongWords),
}

/// Split high/low 32-bit word representation of a 64-bit integer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LongWords {
    pub high: i64,
    pub low: i64,
    pub unsigned: bool,
}
