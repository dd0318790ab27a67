//! Built-in template functions
//!
//! | Name            | Returns                                   |
//! |-----------------|-------------------------------------------|
//! | `$uuid`         | a fresh UUID v7                           |
//! | `$timestamp`    | unix time in seconds                      |
//! | `$isoTimestamp` | RFC 3339 time with millisecond precision  |
//! | `$randomInt`    | integer in `[min, max]`, default `0..=1000` |

use std::sync::Arc;

use chrono::SecondsFormat;
use rand::Rng;
use serde_json::Value;
use tessera_domain::{Argument, FunctionRegistry};
use uuid::Uuid;

use crate::ports::Clock;

const DEFAULT_RANDOM_MIN: i64 = 0;
const DEFAULT_RANDOM_MAX: i64 = 1000;

/// Returns a registry holding the built-in functions.
///
/// Merge it into a context with `TemplateContext::with_functions`; functions
/// the caller registers afterwards override these.
#[must_use]
pub fn builtin_functions(clock: Arc<dyn Clock>) -> FunctionRegistry {
    let mut registry = FunctionRegistry::new();

    registry.register("$uuid", |_: &[Argument]| {
        Value::String(Uuid::now_v7().to_string())
    });

    let timestamp_clock = Arc::clone(&clock);
    registry.register("$timestamp", move |_: &[Argument]| {
        Value::from(timestamp_clock.now().timestamp())
    });

    registry.register("$isoTimestamp", move |_: &[Argument]| {
        Value::String(clock.now().to_rfc3339_opts(SecondsFormat::Millis, true))
    });

    registry.register("$randomInt", random_int);

    registry
}

fn random_int(args: &[Argument]) -> Value {
    let min = args
        .first()
        .and_then(Argument::as_i64)
        .unwrap_or(DEFAULT_RANDOM_MIN);
    let max = args
        .get(1)
        .and_then(Argument::as_i64)
        .unwrap_or(DEFAULT_RANDOM_MAX);
    let (low, high) = if min <= max { (min, max) } else { (max, min) };

    Value::from(rand::rng().random_range(low..=high))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn registry() -> FunctionRegistry {
        let fixed = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap();
        builtin_functions(Arc::new(FixedClock(fixed)))
    }

    fn call(name: &str, args: &[Argument]) -> Value {
        registry().get(name).map(|f| f(args)).unwrap()
    }

    #[test]
    fn test_names() {
        assert_eq!(
            registry().names(),
            vec!["$isoTimestamp", "$randomInt", "$timestamp", "$uuid"]
        );
    }

    #[test]
    fn test_uuid() {
        let value = call("$uuid", &[]);
        assert!(Uuid::parse_str(value.as_str().unwrap()).is_ok());
        assert_ne!(call("$uuid", &[]), value);
    }

    #[test]
    fn test_timestamps_use_clock() {
        assert_eq!(call("$timestamp", &[]), json!(1_704_112_200));
        assert_eq!(call("$isoTimestamp", &[]), json!("2024-01-01T12:30:00.000Z"));
    }

    #[test]
    fn test_random_int_range() {
        let args = [Argument::Literal(json!(5)), Argument::Literal(json!(7))];
        for _ in 0..50 {
            let n = call("$randomInt", &args).as_i64().unwrap();
            assert!((5..=7).contains(&n));
        }
    }

    #[test]
    fn test_random_int_swapped_and_defaults() {
        let swapped = [Argument::Literal(json!(3)), Argument::Literal(json!(1))];
        let n = call("$randomInt", &swapped).as_i64().unwrap();
        assert!((1..=3).contains(&n));

        let n = call("$randomInt", &[Argument::Undefined]).as_i64().unwrap();
        assert!((DEFAULT_RANDOM_MIN..=DEFAULT_RANDOM_MAX).contains(&n));
    }
}
