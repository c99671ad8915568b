//! Structural merge over JSON values
//!
//! Used to fill persisted and imported documents from the defaults.
//!
//! Rules for [`deep_merge`], applied one nesting level at a time:
//!
//! 1. Object over object: merge key by key, recursing into nested objects
//! 2. Anything else (sequence, scalar): the overlay replaces the base wholesale
//! 3. `null` in the overlay means "absent" and keeps the base value
//!
//! Sequences are never merged element-wise, so a persisted `services` list
//! shorter than the default one stays shorter.

use serde_json::Value;

/// Merge `overlay` into `base` recursively.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                if value.is_null() {
                    continue;
                }
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (base, overlay) => *base = overlay,
    }
}

/// Replace top-level keys of `base` with those of `overlay`.
///
/// Nested values are not merged. Non-object inputs leave `base` untouched.
pub fn shallow_merge(base: &mut Value, overlay: Value) {
    if let (Value::Object(base_map), Value::Object(overlay_map)) = (base, overlay) {
        for (key, value) in overlay_map {
            base_map.insert(key, value);
        }
    }
}

/// Human-readable JSON type name for diagnostics.
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
