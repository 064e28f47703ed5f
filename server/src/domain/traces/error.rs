//! Error extraction.
//!
//! Two independent sources feed one normalized error record: the span
//! status first, then `exception` events in event order, each overriding
//! whatever came before it.

use super::types::ErrorRecord;
use super::wire::{AnyValue, KeyValue, WireEnum, WireEvent, WireStatus};

/// Literal fallback when no message survives from either source.
const FALLBACK_MESSAGE: &str = "Exception";

const EXCEPTION_EVENT: &str = "exception";
const EXCEPTION_TYPE: &str = "exception.type";
const EXCEPTION_MESSAGE: &str = "exception.message";
const EXCEPTION_STACKTRACE: &str = "exception.stacktrace";

/// Derive the span's error record, if any.
pub fn extract_error(status: Option<&WireStatus>, events: &[WireEvent]) -> Option<ErrorRecord> {
    let status_message = status
        .and_then(|s| s.message.as_deref())
        .filter(|m| !m.is_empty());

    let mut error = None;
    if status.is_some_and(status_is_error) {
        error = Some(ErrorRecord {
            has_error: true,
            message: status_message.unwrap_or(FALLBACK_MESSAGE).to_string(),
            stacktrace: Vec::new(),
        });
    }

    for event in events.iter().filter(|e| e.name == EXCEPTION_EVENT) {
        let exception_type = attribute_str(&event.attributes, EXCEPTION_TYPE);
        let exception_message = attribute_str(&event.attributes, EXCEPTION_MESSAGE);
        let message = match (exception_type, exception_message) {
            (Some(t), Some(m)) => format!("{t}: {m}"),
            _ => status_message.unwrap_or(FALLBACK_MESSAGE).to_string(),
        };
        let stacktrace = attribute_str(&event.attributes, EXCEPTION_STACKTRACE)
            .map(|trace| trace.lines().map(str::to_string).collect())
            .unwrap_or_default();
        error = Some(ErrorRecord {
            has_error: true,
            message,
            stacktrace,
        });
    }

    error
}

fn status_is_error(status: &WireStatus) -> bool {
    match &status.code {
        Some(WireEnum::Number(code)) => *code == 2,
        Some(WireEnum::Name(name)) => name == "STATUS_CODE_ERROR" || name == "ERROR",
        None => false,
    }
}

/// Raw string lookup. Exception payloads are never JSON-parsed, so error
/// text survives verbatim.
fn attribute_str<'a>(attributes: &'a [KeyValue], key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|kv| kv.key == key)
        .and_then(|kv| match &kv.value {
            Some(AnyValue::StringValue(s)) => Some(s.as_str()),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_status(message: Option<&str>) -> WireStatus {
        WireStatus {
            code: Some(WireEnum::Number(2)),
            message: message.map(str::to_string),
        }
    }

    fn exception_event(pairs: &[(&str, &str)]) -> WireEvent {
        WireEvent {
            name: EXCEPTION_EVENT.to_string(),
            time_unix_nano: None,
            attributes: pairs
                .iter()
                .map(|(key, value)| KeyValue {
                    key: key.to_string(),
                    value: Some(AnyValue::StringValue(value.to_string())),
                })
                .collect(),
        }
    }

    #[test]
    fn test_status_code_two_with_message() {
        let error = extract_error(Some(&error_status(Some("boom"))), &[]).unwrap();
        assert_eq!(
            error,
            ErrorRecord {
                has_error: true,
                message: "boom".to_string(),
                stacktrace: Vec::new(),
            }
        );
    }

    #[test]
    fn test_status_without_message_falls_back() {
        let error = extract_error(Some(&error_status(None)), &[]).unwrap();
        assert_eq!(error.message, "Exception");
    }

    #[test]
    fn test_symbolic_status_code() {
        let status = WireStatus {
            code: Some(WireEnum::Name("STATUS_CODE_ERROR".to_string())),
            message: Some("bad".to_string()),
        };
        assert!(extract_error(Some(&status), &[]).is_some());
    }

    #[test]
    fn test_ok_status_yields_no_error() {
        let status = WireStatus {
            code: Some(WireEnum::Number(1)),
            message: Some("fine".to_string()),
        };
        assert_eq!(extract_error(Some(&status), &[]), None);
        assert_eq!(extract_error(None, &[]), None);
    }

    #[test]
    fn test_exception_event_composes_type_and_message() {
        let events = vec![exception_event(&[
            ("exception.type", "ValueError"),
            ("exception.message", "bad input"),
            ("exception.stacktrace", "line one\nline two"),
        ])];
        let error = extract_error(None, &events).unwrap();
        assert_eq!(error.message, "ValueError: bad input");
        assert_eq!(error.stacktrace, vec!["line one", "line two"]);
    }

    #[test]
    fn test_exception_event_overrides_status() {
        let events = vec![exception_event(&[
            ("exception.type", "Timeout"),
            ("exception.message", "deadline exceeded"),
        ])];
        let error = extract_error(Some(&error_status(Some("boom"))), &events).unwrap();
        assert_eq!(error.message, "Timeout: deadline exceeded");
    }

    #[test]
    fn test_partial_exception_falls_back_to_status_message() {
        // Only one of type/message present: the status message wins
        let events = vec![exception_event(&[("exception.message", "lonely")])];
        let error = extract_error(Some(&error_status(Some("boom"))), &events).unwrap();
        assert_eq!(error.message, "boom");

        let events = vec![exception_event(&[("exception.type", "KeyError")])];
        let error = extract_error(None, &events).unwrap();
        assert_eq!(error.message, "Exception");
    }

    #[test]
    fn test_last_exception_event_wins() {
        let events = vec![
            exception_event(&[("exception.type", "A"), ("exception.message", "first")]),
            exception_event(&[("exception.type", "B"), ("exception.message", "second")]),
        ];
        let error = extract_error(None, &events).unwrap();
        assert_eq!(error.message, "B: second");
    }
}
