//! Template variables: slot values merged with call-time overrides.

use serde_json::Value;
use std::collections::HashMap;

/// Flat name -> value mapping used for placeholder substitution
pub type Variables = HashMap<String, Value>;

/// Merge slot values with overrides; overrides win on key collision.
///
/// Absent slot values are treated as an empty mapping. Keys are not checked
/// against any schema.
pub fn resolve(slot_values: Option<&Variables>, overrides: &Variables) -> Variables {
    let mut merged = slot_values.cloned().unwrap_or_default();
    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// String form of a variable as it appears in rendered text.
///
/// Strings are inserted verbatim, everything else uses its compact JSON form,
/// so booleans and unset values read `true`/`false`/`null` rather than the
/// `True`/`None` spelling some dialogue frameworks produce.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
