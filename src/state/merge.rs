//! Recursive merge of JSON state trees.
//!
//! Objects merge key by key; every other value (arrays included) is a
//! terminal and replaces whatever the target held at that path.

use serde_json::{Map, Value};

/// Default terminal test: anything that is not an object.
pub fn is_leaf(value: &Value) -> bool {
    !value.is_object()
}

/// Deep-merge `source` into `target`, treating every non-object as a terminal.
pub fn deep_merge(target: &mut Value, source: &Value) {
    merge_with(target, source, &is_leaf);
}

/// Deep-merge the entries of `source` into the object `target`.
pub fn deep_merge_map(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    merge_entries(target, source, &is_leaf);
}

/// Deep-merge using a caller-supplied terminal test.
///
/// A path recurses only when both sides are objects and neither is reported
/// terminal by `is_terminal`; otherwise the source value is cloned over the target.
pub fn merge_with<F>(target: &mut Value, source: &Value, is_terminal: &F)
where
    F: Fn(&Value) -> bool,
{
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) if !is_terminal(source) => {
            merge_entries(target_map, source_map, is_terminal);
        }
        (target, source) => {
            *target = source.clone();
        }
    }
}

fn merge_entries<F>(
    target: &mut Map<String, Value>,
    source: &Map<String, Value>,
    is_terminal: &F,
)
where
    F: Fn(&Value) -> bool,
{
    for (key, value) in source {
        match target.get_mut(key) {
            Some(existing) if !is_terminal(&*existing) => merge_with(existing, value, is_terminal),
            Some(existing) => *existing = value.clone(),
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
