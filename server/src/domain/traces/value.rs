//! Wire value decoding.
//!
//! Converts one typed wire value into its native JSON equivalent. String
//! payloads are auto-parsed as JSON with a raw-string fallback, the literal
//! `"None"` is a null sentinel some upstream SDKs emit, and byte payloads
//! stay base64-encoded so they survive textual transport. Split-word 64-bit
//! integers go through [`decode_words`].

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

use super::wire::{AnyValue, LongWords, WireBytes, WireLong};

/// Null sentinel: a language-specific string encoding of "no value".
const NULL_SENTINEL: &str = "None";

/// Decode one wire value. Absent input decodes to null rather than failing.
pub fn decode_value(value: Option<&AnyValue>) -> JsonValue {
    let Some(value) = value else {
        return JsonValue::Null;
    };
    match value {
        AnyValue::StringValue(s) => decode_string(s),
        AnyValue::BoolValue(b) => JsonValue::Bool(*b),
        AnyValue::IntValue(long) => decode_long(long)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        AnyValue::DoubleValue(d) => JsonNumber::from_f64(*d)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        AnyValue::BytesValue(bytes) => JsonValue::String(encode_bytes(bytes)),
        AnyValue::ArrayValue(array) => JsonValue::Array(
            array
                .values
                .iter()
                .map(|element| decode_value(Some(element)))
                .collect(),
        ),
        AnyValue::KvlistValue(kvlist) => {
            let map: JsonMap<String, JsonValue> = kvlist
                .values
                .iter()
                .map(|kv| (kv.key.clone(), decode_value(kv.value.as_ref())))
                .collect();
            JsonValue::Object(map)
        }
    }
}

/// String values carry embedded JSON more often than not; parse when
/// possible, fall back to the raw string otherwise.
pub fn decode_string(s: &str) -> JsonValue {
    if s == NULL_SENTINEL {
        return JsonValue::Null;
    }
    serde_json::from_str(s).unwrap_or_else(|_| JsonValue::String(s.to_string()))
}

fn encode_bytes(bytes: &WireBytes) -> String {
    match bytes {
        WireBytes::Encoded(s) => s.clone(),
        WireBytes::Raw(raw) => BASE64.encode(raw),
    }
}

/// Decode a 64-bit integer from any wire encoding.
pub fn decode_long(long: &WireLong) -> Option<JsonNumber> {
    match long {
        WireLong::Unsigned(u) => Some(JsonNumber::from(*u)),
        WireLong::Signed(i) => Some(JsonNumber::from(*i)),
        WireLong::Float(f) => JsonNumber::from_f64(*f),
        WireLong::Decimal(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                Some(JsonNumber::from(i))
            } else if let Ok(u) = s.parse::<u64>() {
                Some(JsonNumber::from(u))
            } else {
                s.parse::<f64>().ok().and_then(JsonNumber::from_f64)
            }
        }
        WireLong::Words(words) => Some(match decode_words(words) {
            DecodedWords::Signed(i) => JsonNumber::from(i),
            DecodedWords::Unsigned(u) => JsonNumber::from(u),
        }),
    }
}

/// Result of composing a split-word pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedWords {
    Signed(i64),
    Unsigned(u64),
}

impl DecodedWords {
    pub fn as_i128(self) -> i128 {
        match self {
            Self::Signed(i) => i as i128,
            Self::Unsigned(u) => u as i128,
        }
    }
}

/// Compose `(high << 32) | (low & 0xFFFF_FFFF)`. Unsigned values pass
/// through; otherwise the sign bit is reinterpreted via two's complement.
/// Bit-exact over the full 64-bit range.
pub fn decode_words(words: &LongWords) -> DecodedWords {
    let bits = ((words.high as u64 & 0xFFFF_FFFF) << 32) | (words.low as u64 & 0xFFFF_FFFF);
    if words.unsigned {
        DecodedWords::Unsigned(bits)
    } else {
        DecodedWords::Signed(bits as i64)
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
