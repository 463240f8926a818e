use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Synonym-key lookup machinery for the upstream API's inconsistent payloads.
/// Every accessor walks its key list in order and the first present, usable
/// value wins; later synonyms are never consulted once one matches.

pub fn object_get_case_insensitive<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).or_else(|| {
        object
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

/// Resolves a dotted path ("budget.current") case-insensitively per segment.
pub fn path_value<'a>(object: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = object_get_case_insensitive(object, first)?;
    for segment in segments {
        let nested = current.as_object()?;
        current = object_get_case_insensitive(nested, segment)?;
    }
    Some(current)
}

pub fn string_from_paths(object: &Map<String, Value>, paths: &[&str]) -> Option<String> {
    for path in paths {
        let Some(value) = path_value(object, path) else {
            continue;
        };
        match value {
            Value::String(s) => {
                if !s.trim().is_empty() {
                    return Some(s.trim().to_string());
                }
            }
            Value::Number(n) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

pub fn number_from_paths(object: &Map<String, Value>, paths: &[&str]) -> Option<f64> {
    for path in paths {
        let Some(value) = path_value(object, path) else {
            continue;
        };
        if let Some(number) = to_f64(value) {
            return Some(number);
        }
    }
    None
}

pub fn integer_from_paths(object: &Map<String, Value>, paths: &[&str]) -> Option<i64> {
    number_from_paths(object, paths).map(|n| n.round() as i64)
}

pub fn bool_from_paths(object: &Map<String, Value>, paths: &[&str]) -> Option<bool> {
    for path in paths {
        let Some(value) = path_value(object, path) else {
            continue;
        };
        match value {
            Value::Bool(b) => return Some(*b),
            Value::Number(n) => return n.as_i64().map(|v| v != 0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => return Some(true),
                "false" | "no" | "0" => return Some(false),
                _ => {}
            },
            _ => {}
        }
    }
    None
}

/// Accepts RFC 3339 strings or epoch seconds.
pub fn timestamp_from_paths(object: &Map<String, Value>, paths: &[&str]) -> Option<DateTime<Utc>> {
    for path in paths {
        let Some(value) = path_value(object, path) else {
            continue;
        };
        match value {
            Value::String(s) => {
                if let Ok(parsed) = DateTime::parse_from_rfc3339(s.trim()) {
                    return Some(parsed.with_timezone(&Utc));
                }
            }
            Value::Number(n) => {
                if let Some(secs) = n.as_i64() {
                    if let Some(parsed) = DateTime::from_timestamp(secs, 0) {
                        return Some(parsed);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// First key under the root whose value is an array of objects.
pub fn array_from_keys<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    let object = value.as_object()?;
    for key in keys {
        if let Some(candidate) = object_get_case_insensitive(object, key) {
            if let Some(array) = candidate.as_array() {
                if looks_like_object_array(array) {
                    return Some(array);
                }
            }
        }
    }
    None
}

fn looks_like_object_array(array: &[Value]) -> bool {
    array.iter().take(5).any(Value::is_object)
}

pub fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let sanitized = s.trim().replace(',', "").replace('%', "").replace('_', "");
            sanitized.parse::<f64>().ok()
        }
        _ => None,
    }
}
