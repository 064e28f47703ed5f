//! Timestamp normalization.
//!
//! Producers report nanoseconds since epoch as plain numbers, decimal
//! strings, or split word pairs. Normalized form is integer epoch
//! milliseconds, `round(ns / 1e6)`. Zero or unparsable input means
//! "unknown", not "at epoch", and surfaces as absent.

use super::value::decode_words;
use super::wire::{WireEvent, WireLong};

/// Event name streaming instrumentations emit when the first token arrives.
const FIRST_TOKEN_EVENT: &str = "first_token";

/// Normalize one nanosecond time value to epoch milliseconds.
pub fn epoch_millis(value: &WireLong) -> Option<i64> {
    let nanos: i128 = match value {
        WireLong::Unsigned(u) => *u as i128,
        WireLong::Signed(i) => *i as i128,
        WireLong::Float(f) if f.is_finite() => f.round() as i128,
        WireLong::Float(_) => return None,
        WireLong::Decimal(s) => parse_decimal(s)?,
        WireLong::Words(words) => decode_words(words).as_i128(),
    };
    if nanos == 0 {
        return None;
    }
    let millis = (nanos + 500_000).div_euclid(1_000_000);
    i64::try_from(millis).ok()
}

fn parse_decimal(s: &str) -> Option<i128> {
    let s = s.trim();
    if let Ok(n) = s.parse::<i128>() {
        return Some(n);
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f.round() as i128)
}

/// Timestamp of the first streaming token, taken from span events.
pub fn first_token_millis(events: &[WireEvent]) -> Option<i64> {
    events
        .iter()
        .find(|event| event.name == FIRST_TOKEN_EVENT)
        .and_then(|event| event.time_unix_nano.as_ref())
        .and_then(epoch_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traces::wire::LongWords;

    #[test]
    fn test_nanos_round_to_millis() {
        // .456789 ms rounds down to the nearest millisecond
        assert_eq!(
            epoch_millis(&WireLong::Unsigned(1_700_000_000_123_456_789)),
            Some(1_700_000_000_123)
        );
        // .6 ms rounds up
        assert_eq!(
            epoch_millis(&WireLong::Unsigned(1_700_000_000_123_600_000)),
            Some(1_700_000_000_124)
        );
        // .4 ms rounds down
        assert_eq!(
            epoch_millis(&WireLong::Unsigned(1_000_000_000_000_400_000)),
            Some(1_000_000_000_000)
        );
    }

    #[test]
    fn test_zero_is_absent_not_epoch() {
        assert_eq!(epoch_millis(&WireLong::Unsigned(0)), None);
        assert_eq!(epoch_millis(&WireLong::Decimal("0".to_string())), None);
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(
            epoch_millis(&WireLong::Decimal("1700000000000000000".to_string())),
            Some(1_700_000_000_000)
        );
    }

    #[test]
    fn test_unparsable_is_absent() {
        assert_eq!(epoch_millis(&WireLong::Decimal("soon".to_string())), None);
        assert_eq!(epoch_millis(&WireLong::Float(f64::NAN)), None);
    }

    #[test]
    fn test_split_words_timestamp() {
        // 1_000_000_000_000_000_000 ns = 0x0DE0_B6B3_A764_0000
        let words = WireLong::Words(LongWords {
            high: 0x0DE0_B6B3,
            low: 0xA764_0000_u32 as i32 as i64,
            unsigned: false,
        });
        assert_eq!(epoch_millis(&words), Some(1_000_000_000_000));
    }

    #[test]
    fn test_first_token_event_lookup() {
        let events = vec![
            WireEvent {
                name: "other".to_string(),
                time_unix_nano: Some(WireLong::Unsigned(1)),
                attributes: Vec::new(),
            },
            WireEvent {
                name: "first_token".to_string(),
                time_unix_nano: Some(WireLong::Unsigned(2_000_000)),
                attributes: Vec::new(),
            },
        ];
        assert_eq!(first_token_millis(&events), Some(2));
        assert_eq!(first_token_millis(&[]), None);
    }
}
